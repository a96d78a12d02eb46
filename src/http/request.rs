//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Lee la cabecera de un request desde el socket y la parsea.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! GET /path?query HTTP/1.0\r\n
//! Host: localhost:8000\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! ```
//!
//! Solo interesa el path: el servidor no distingue métodos ni lee bodies.

use std::collections::HashMap;
use percent_encoding::percent_decode_str;
use std::io::{self, Read};
use thiserror::Error;

/// Tamaño máximo de la cabecera de un request
pub const MAX_REQUEST_SIZE: usize = 8192;

/// Representa un request HTTP/1.0 parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP tal cual llegó (GET, HEAD, ...)
    method: String,

    /// Path decodificado, sin query string (ej: "/docs/a b.txt")
    path: String,

    /// Query string sin el '?' inicial, si venía
    query: Option<String>,

    /// Headers HTTP (ej: {"Host": "localhost:8000"})
    headers: HashMap<String, String>,

    /// Versión HTTP tal cual llegó ("HTTP/1.0", "HTTP/1.1", ...)
    version: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// El cliente cerró sin enviar nada
    #[error("Empty request")]
    EmptyRequest,

    /// La cabecera no terminó dentro del límite
    #[error("Request head exceeds {0} bytes")]
    TooLarge(usize),

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// El path no empieza con '/' o no es UTF-8 tras decodificar
    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    /// Versión HTTP incorrecta (debe ser "HTTP/" seguido de algo)
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Header malformado
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),
}

/// Lee la cabecera de un request desde `reader` y la parsea
///
/// Lee hasta encontrar la línea vacía, hasta fin de stream o hasta
/// `MAX_REQUEST_SIZE` bytes. Lo que venga después de la cabecera se ignora.
pub fn parse_request<R: Read>(reader: &mut R) -> Result<Request, ParseError> {
    let head = read_head(reader)?;
    Request::parse(&head)
}

fn read_head<R: Read>(reader: &mut R) -> Result<Vec<u8>, ParseError> {
    let mut head = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            break;
        }

        head.extend_from_slice(&chunk[..n]);

        if find_head_end(&head).is_some() {
            break;
        }
        if head.len() >= MAX_REQUEST_SIZE {
            return Err(ParseError::TooLarge(MAX_REQUEST_SIZE));
        }
    }

    Ok(head)
}

/// Posición donde termina la cabecera (antes de la línea vacía)
fn find_head_end(buf: &[u8]) -> Option<usize> {
    let crlf = buf.windows(4).position(|w| w == b"\r\n\r\n");
    let lf = buf.windows(2).position(|w| w == b"\n\n");
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl Request {
    /// Parsea un request HTTP/1.0 desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use httpserver::http::Request;
    ///
    /// let raw = b"GET /docs/index.html?v=2 HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/docs/index.html");
    /// assert_eq!(request.query(), Some("v=2"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let head = match find_head_end(buffer) {
            Some(end) => &buffer[..end],
            None => buffer,
        };

        let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;

        if head.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = head.split('\n').map(|line| line.trim_end_matches('\r'));

        // 1. Request line
        let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;
        let (method, path, query, version) = Self::parse_request_line(request_line)?;

        // 2. Headers
        let headers = Self::parse_headers(lines)?;

        Ok(Request {
            method,
            path,
            query,
            headers,
            version,
        })
    }

    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(
        line: &str,
    ) -> Result<(String, String, Option<String>, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = parts[0];
        if !method.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ParseError::InvalidMethod(method.to_string()));
        }

        let raw_target = parts[1];
        if !raw_target.starts_with('/') {
            return Err(ParseError::InvalidPath(raw_target.to_string()));
        }
        let (raw_path, query) = match raw_target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (raw_target, None),
        };
        // Un '%' sin dos dígitos hex queda literal; el resultado debe ser UTF-8
        let path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| ParseError::InvalidPath(raw_target.to_string()))?
            .into_owned();

        // Cualquier versión "HTTP/x"; la respuesta siempre sale como HTTP/1.0
        let version = parts[2];
        if !version.starts_with("HTTP/") || version.len() == "HTTP/".len() {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }

        Ok((method.to_string(), path, query, version.to_string()))
    }

    /// Cada header tiene formato: "Name: Value"
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path decodificado y sin query string
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

//! # Escritura de Respuestas HTTP
//!
//! Escribe la respuesta directamente sobre el socket, por partes: status line,
//! headers, línea vacía y body. Así un archivo grande se envía en bloques sin
//! cargarlo completo en memoria.
//!
//! ## Formato de una respuesta HTTP/1.0
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! Server: httpserver/1.0\r\n
//! \r\n
//! <h1>hola</h1>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use httpserver::http::{ResponseWriter, StatusCode};
//!
//! let mut out = Vec::new();
//! let mut writer = ResponseWriter::new(&mut out);
//! writer.start_response(StatusCode::Ok).unwrap();
//! writer.send_header("Content-Type", "text/plain").unwrap();
//! writer.end_headers().unwrap();
//! writer.send_string("hi\n").unwrap();
//! writer.finish().unwrap();
//!
//! assert!(out.starts_with(b"HTTP/1.0 200 OK\r\n"));
//! ```

use super::StatusCode;
use std::io::{self, BufWriter, Read, Write};

/// Valor del header `Server` en todas las respuestas
pub const SERVER_NAME: &str = "httpserver/1.0";

/// Escritor incremental de una respuesta HTTP/1.0
pub struct ResponseWriter<W: Write> {
    inner: BufWriter<W>,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
        }
    }

    /// Escribe la status line y el header `Server`
    pub fn start_response(&mut self, status: StatusCode) -> io::Result<()> {
        write!(self.inner, "HTTP/1.0 {}\r\n", status)?;
        self.send_header("Server", SERVER_NAME)
    }

    /// Formato: `Header-Name: Value\r\n`
    pub fn send_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        write!(self.inner, "{}: {}\r\n", name, value)
    }

    /// Línea vacía que separa headers del body
    pub fn end_headers(&mut self) -> io::Result<()> {
        self.inner.write_all(b"\r\n")
    }

    pub fn send_data(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_all(data)
    }

    pub fn send_string(&mut self, data: &str) -> io::Result<()> {
        self.send_data(data.as_bytes())
    }

    /// Copia todo `reader` como body; retorna los bytes enviados
    pub fn send_body_from<R: Read>(&mut self, reader: &mut R) -> io::Result<u64> {
        io::copy(reader, &mut self.inner)
    }

    /// Vacía el buffer hacia el socket
    pub fn finish(mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Envía una página HTML completa (usada para errores y listados)
pub fn send_html_page<W: Write>(stream: W, status: StatusCode, html: &str) -> io::Result<()> {
    let mut writer = ResponseWriter::new(stream);
    writer.start_response(status)?;
    writer.send_header("Content-Type", "text/html")?;
    writer.send_header("Content-Length", &html.len().to_string())?;
    writer.end_headers()?;
    writer.send_string(html)?;
    writer.finish()
}

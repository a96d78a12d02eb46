//! # Handler de Archivos
//! src/handlers/files.rs
//!
//! Sirve archivos bajo la raíz configurada:
//!
//! 1. Parsea el request (si falla → 500)
//! 2. Concatena raíz + path y hace `stat`
//!    - no existe → 404
//!    - archivo regular → 200 con el contenido
//!    - directorio con `index.html` → 200 con ese archivo
//!    - directorio sin `index.html` → 200 con un listado de enlaces
//!    - cualquier otra cosa → 404
//!
//! Los segmentos `.` y `..` se resuelven antes de tocar el disco; un `..`
//! que sube por encima de la raíz se responde con 404.

use super::RequestHandler;
use crate::http::{self, mime_type_for, send_html_page, ResponseWriter, StatusCode};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::net::TcpStream;
use html_escape::{encode_double_quoted_attribute, encode_text};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const NOT_FOUND_PAGE: &str = "<center><h1>File or Directory Not Found</h1></center>";
const INTERNAL_ERROR_PAGE: &str = "<center><h1>Internal Error</h1></center>";

/// Bytes que se codifican en los enlaces del listado; '/' queda literal
const HREF_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Handler que sirve archivos desde un directorio raíz
#[derive(Debug, Clone)]
pub struct FileHandler {
    root: PathBuf,
}

impl FileHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Atiende un request sobre `stream` y retorna el status enviado
    pub fn serve<S: Read + Write>(&self, stream: &mut S) -> io::Result<StatusCode> {
        let request = match http::parse_request(stream) {
            Ok(request) => request,
            Err(e) => {
                debug!("   ❌ Parse error: {}", e);
                send_html_page(&mut *stream, StatusCode::InternalServerError, INTERNAL_ERROR_PAGE)?;
                return Ok(StatusCode::InternalServerError);
            }
        };

        let path = request.path();
        let status = self.respond(stream, path)?;
        info!("   ✅ {} {} → {}", request.method(), path, status);
        Ok(status)
    }

    fn respond<W: Write>(&self, stream: &mut W, request_path: &str) -> io::Result<StatusCode> {
        let request_path = match normalize_path(request_path) {
            Some(path) => path,
            None => return not_found(stream),
        };
        let request_path = request_path.as_str();

        let candidate = self.resolve(request_path);
        debug!("   📂 {} → {}", request_path, candidate.display());

        let metadata = match fs::metadata(&candidate) {
            Ok(metadata) => metadata,
            Err(_) => return not_found(stream),
        };

        if metadata.is_file() {
            return serve_file(stream, &candidate);
        }

        if metadata.is_dir() {
            let index = candidate.join("index.html");
            if index.is_file() {
                return serve_file(stream, &index);
            }
            return list_directory(stream, &candidate, &with_trailing_slash(request_path));
        }

        // Sockets, FIFOs, dispositivos...
        not_found(stream)
    }

    /// Raíz concatenada con el path del request
    fn resolve(&self, request_path: &str) -> PathBuf {
        let mut candidate = self.root.clone().into_os_string();
        candidate.push(request_path);
        PathBuf::from(candidate)
    }
}

impl RequestHandler for FileHandler {
    fn handle(&self, mut stream: TcpStream) -> io::Result<()> {
        self.serve(&mut stream)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "files"
    }
}

/// 200 con `Content-Type` por extensión y `Content-Length` exacto
fn serve_file<W: Write>(stream: &mut W, path: &Path) -> io::Result<StatusCode> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return not_found(stream),
    };
    let size = file.metadata()?.len();

    let mut writer = ResponseWriter::new(stream);
    writer.start_response(StatusCode::Ok)?;
    writer.send_header("Content-Type", mime_type_for(path))?;
    writer.send_header("Content-Length", &size.to_string())?;
    writer.end_headers()?;
    writer.send_body_from(&mut file)?;
    writer.finish()?;

    Ok(StatusCode::Ok)
}

/// 200 con un enlace por entrada, en el orden en que las entrega el sistema
fn list_directory<W: Write>(stream: &mut W, dir: &Path, request_path: &str) -> io::Result<StatusCode> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return not_found(stream),
    };

    // read_dir omite "." y ".."; la raíz no tiene padre al que subir
    let mut names = vec![".".to_string()];
    if request_path != "/" {
        names.push("..".to_string());
    }
    names.extend(
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned()),
    );

    let mut body = String::from("<html><body><ul>");
    for name in &names {
        let link = format!("{}{}", request_path, name);
        let href = utf8_percent_encode(&link, HREF_PATH).to_string();
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>",
            encode_double_quoted_attribute(&href),
            encode_text(name)
        ));
    }
    body.push_str("</ul></body></html>");

    send_html_page(stream, StatusCode::Ok, &body)?;
    Ok(StatusCode::Ok)
}

fn not_found<W: Write>(stream: &mut W) -> io::Result<StatusCode> {
    send_html_page(stream, StatusCode::NotFound, NOT_FOUND_PAGE)?;
    Ok(StatusCode::NotFound)
}

/// Resuelve `.` y `..` sobre el path del request
///
/// Retorna `None` si un `..` sube por encima de la raíz. Conserva la barra
/// final para que `/a.txt/` siga sin ser un archivo.
fn normalize_path(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            segment => segments.push(segment),
        }
    }

    let mut normalized = format!("/{}", segments.join("/"));
    if path.ends_with('/') && !segments.is_empty() {
        normalized.push('/');
    }
    Some(normalized)
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Stream en memoria: lee el request y acumula la respuesta
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(request: &str) -> Self {
            Self {
                input: Cursor::new(request.as_bytes().to_vec()),
                output: Vec::new(),
            }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn www() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hi\n").unwrap();
        fs::create_dir(dir.path().join("site")).unwrap();
        fs::write(dir.path().join("site/index.html"), b"<h1>home</h1>").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/one.txt"), b"1").unwrap();
        fs::write(dir.path().join("docs/two.txt"), b"22").unwrap();
        dir
    }

    fn get(handler: &FileHandler, path: &str) -> (StatusCode, Vec<u8>) {
        let mut stream = MockStream::new(&format!("GET {} HTTP/1.0\r\n\r\n", path));
        let status = handler.serve(&mut stream).unwrap();
        (status, stream.output)
    }

    fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
        let end = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = String::from_utf8(raw[..end].to_vec()).unwrap();
        (head, raw[end + 4..].to_vec())
    }

    #[test]
    fn test_serves_regular_file() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let (status, raw) = get(&handler, "/a.txt");
        let (head, body) = split_response(&raw);

        assert_eq!(status, StatusCode::Ok);
        assert!(head.starts_with("HTTP/1.0 200 OK"));
        assert!(head.contains("Content-Length: 3"));
        assert!(head.contains("Content-Type: text/plain"));
        assert_eq!(body, b"hi\n");
    }

    #[test]
    fn test_binary_file_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let payload: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
        fs::write(dir.path().join("blob.bin"), &payload).unwrap();
        let handler = FileHandler::new(dir.path());

        let (status, raw) = get(&handler, "/blob.bin");
        let (head, body) = split_response(&raw);

        assert_eq!(status, StatusCode::Ok);
        assert!(head.contains("Content-Length: 100000"));
        assert_eq!(body, payload);
    }

    #[test]
    fn test_missing_file_is_404() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let (status, raw) = get(&handler, "/missing.txt");
        let (head, _) = split_response(&raw);

        assert_eq!(status, StatusCode::NotFound);
        assert!(head.starts_with("HTTP/1.0 404 Not Found"));
    }

    #[test]
    fn test_directory_with_index_serves_index() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let (status, via_dir) = get(&handler, "/site");
        let (_, direct) = get(&handler, "/site/index.html");

        assert_eq!(status, StatusCode::Ok);
        assert_eq!(via_dir, direct);

        let (_, with_slash) = get(&handler, "/site/");
        assert_eq!(with_slash, direct);
    }

    #[test]
    fn test_directory_without_index_lists_entries() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let (status, raw) = get(&handler, "/docs");
        let (head, body) = split_response(&raw);
        let body = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::Ok);
        assert!(head.contains("Content-Type: text/html"));
        assert_eq!(body.matches("<a href=").count(), 4);
        assert!(body.contains("<a href=\"/docs/.\">.</a>"));
        assert!(body.contains("<a href=\"/docs/..\">..</a>"));
        assert!(body.contains("<a href=\"/docs/one.txt\">one.txt</a>"));
        assert!(body.contains("<a href=\"/docs/two.txt\">two.txt</a>"));
    }

    #[test]
    fn test_root_listing_uses_single_slash() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let (_, raw) = get(&handler, "/");
        let (_, body) = split_response(&raw);
        let body = String::from_utf8(body).unwrap();

        assert!(body.contains("<a href=\"/.\">.</a>"));
        assert!(body.contains("<a href=\"/a.txt\">a.txt</a>"));
        assert!(body.contains("<a href=\"/docs\">docs</a>"));
        assert!(!body.contains("\"/..\""));
        assert_eq!(body.matches("<a href=").count(), 4);
    }

    #[test]
    fn test_empty_directory_lists_only_dot_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        let handler = FileHandler::new(dir.path());

        let (status, raw) = get(&handler, "/empty/");
        let (_, body) = split_response(&raw);

        assert_eq!(status, StatusCode::Ok);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "<html><body><ul>\
             <li><a href=\"/empty/.\">.</a></li>\
             <li><a href=\"/empty/..\">..</a></li>\
             </ul></body></html>"
        );
    }

    #[test]
    fn test_every_listing_link_resolves() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();
        for name in ["100%41.txt", "what?.txt", "hash#1.txt", "sp ace.txt", "plain.txt"] {
            fs::write(dir.path().join("d").join(name), name.as_bytes()).unwrap();
        }
        let handler = FileHandler::new(dir.path());

        let (_, raw) = get(&handler, "/d");
        let (_, body) = split_response(&raw);
        let body = String::from_utf8(body).unwrap();

        assert!(body.contains("href=\"/d/100%2541.txt\">100%41.txt</a>"));
        assert!(body.contains("href=\"/d/what%3F.txt\">what?.txt</a>"));

        let hrefs: Vec<&str> = body
            .split("href=\"")
            .skip(1)
            .map(|rest| &rest[..rest.find('"').unwrap()])
            .collect();
        assert_eq!(hrefs.len(), 7);

        for href in hrefs {
            let (status, _) = get(&handler, href);
            assert_eq!(status, StatusCode::Ok, "link {} did not resolve", href);
        }

        let (_, raw) = get(&handler, "/d/100%2541.txt");
        let (_, body) = split_response(&raw);
        assert_eq!(body, b"100%41.txt");
    }

    #[test]
    fn test_listing_escapes_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("odd")).unwrap();
        fs::write(dir.path().join("odd/<b>.txt"), b"x").unwrap();
        let handler = FileHandler::new(dir.path());

        let (_, raw) = get(&handler, "/odd");
        let (_, body) = split_response(&raw);
        let body = String::from_utf8(body).unwrap();

        assert!(body.contains("&lt;b&gt;.txt"));
        assert!(!body.contains("<b>"));
    }

    #[test]
    fn test_percent_encoded_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("my file.txt"), b"spaced").unwrap();
        let handler = FileHandler::new(dir.path());

        let (status, raw) = get(&handler, "/my%20file.txt");
        let (_, body) = split_response(&raw);

        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, b"spaced");
    }

    #[test]
    fn test_parent_traversal_is_404() {
        let outer = tempfile::tempdir().unwrap();
        fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
        fs::create_dir(outer.path().join("www")).unwrap();
        let handler = FileHandler::new(outer.path().join("www"));

        let (status, _) = get(&handler, "/../secret.txt");
        assert_eq!(status, StatusCode::NotFound);

        let (status, _) = get(&handler, "/%2e%2e/secret.txt");
        assert_eq!(status, StatusCode::NotFound);

        let (status, _) = get(&handler, "/inner/../../secret.txt");
        assert_eq!(status, StatusCode::NotFound);
    }

    #[test]
    fn test_parent_segment_inside_root() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let (status, raw) = get(&handler, "/docs/../a.txt");
        let (_, body) = split_response(&raw);
        assert_eq!(status, StatusCode::Ok);
        assert_eq!(body, b"hi\n");

        // El enlace ".." de /docs lista la raíz
        let (_, up) = get(&handler, "/docs/..");
        let (_, root) = get(&handler, "/");
        assert_eq!(up, root);
    }

    #[test]
    fn test_malformed_request_is_500() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let mut stream = MockStream::new("\x00\x01garbage\r\n\r\n");
        let status = handler.serve(&mut stream).unwrap();
        let (head, _) = split_response(&stream.output);

        assert_eq!(status, StatusCode::InternalServerError);
        assert!(head.starts_with("HTTP/1.0 500 Internal Server Error"));
    }

    #[test]
    fn test_empty_request_is_500() {
        let dir = www();
        let handler = FileHandler::new(dir.path());

        let mut stream = MockStream::new("");
        let status = handler.serve(&mut stream).unwrap();

        assert_eq!(status, StatusCode::InternalServerError);
    }

    #[cfg(unix)]
    #[test]
    fn test_special_file_is_404() {
        use std::os::unix::net::UnixListener;

        let dir = tempfile::tempdir().unwrap();
        let _socket = UnixListener::bind(dir.path().join("sock")).unwrap();
        let handler = FileHandler::new(dir.path());

        let (status, _) = get(&handler, "/sock");
        assert_eq!(status, StatusCode::NotFound);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(normalize_path("/a/../b").as_deref(), Some("/b"));
        assert_eq!(normalize_path("/docs/..").as_deref(), Some("/"));
        assert_eq!(normalize_path("/docs/./").as_deref(), Some("/docs/"));
        assert_eq!(normalize_path("/a/..b/c").as_deref(), Some("/a/..b/c"));
        assert_eq!(normalize_path("/a.txt/").as_deref(), Some("/a.txt/"));
        assert_eq!(normalize_path("/.."), None);
        assert_eq!(with_trailing_slash("/docs"), "/docs/");
        assert_eq!(with_trailing_slash("/docs/"), "/docs/");
    }
}

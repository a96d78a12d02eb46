//! # Módulo HTTP
//!
//! Lo mínimo del protocolo HTTP/1.0 que necesitan los handlers:
//!
//! - Lectura y parsing de la cabecera del request
//! - Escritura incremental de respuestas (status line, headers, body)
//! - Códigos de estado
//! - Tipo MIME por extensión
//!
//! No hay keep-alive ni chunked encoding: cada conexión lleva un único
//! request y se cierra después de la respuesta.

pub mod mime;
pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use mime::mime_type_for;
pub use request::{parse_request, ParseError, Request};
pub use response::{send_html_page, ResponseWriter};
pub use status::StatusCode;

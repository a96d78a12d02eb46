//! # Tipos MIME
//!
//! `Content-Type` según la extensión del archivo.

use std::path::Path;

/// Tipo por defecto cuando la extensión no se reconoce
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Retorna el tipo MIME para `path` según su extensión
///
/// # Ejemplo
/// ```
/// use httpserver::http::mime_type_for;
///
/// assert_eq!(mime_type_for("www/index.html"), "text/html");
/// assert_eq!(mime_type_for("README"), "text/plain");
/// ```
pub fn mime_type_for<P: AsRef<Path>>(path: P) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
}

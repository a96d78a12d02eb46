//! # Handlers de Conexión
//! src/handlers/mod.rs
//!
//! Un handler recibe una conexión aceptada y la atiende de principio a fin.
//! Hay dos variantes y se elige una sola al arrancar, según el modo:
//!
//! ```text
//! --files DIR        → FileHandler   (archivos, índices y listados)
//! --proxy HOST:PORT  → ProxyHandler  (relay de bytes en ambos sentidos)
//! ```

pub mod files;
pub mod proxy;

pub use files::FileHandler;
pub use proxy::{ProxyHandler, RelayStats};

use crate::config::ServeMode;
use std::io;
use std::net::TcpStream;
use std::sync::Arc;

/// Atiende una conexión completa
///
/// El handler es dueño de `stream`: la conexión se cierra cuando lo suelta.
/// Los errores de protocolo se responden dentro del handler; solo los
/// errores de transporte llegan al llamador.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, stream: TcpStream) -> io::Result<()>;

    /// Nombre corto para los logs
    fn name(&self) -> &'static str;
}

/// Construye el handler que corresponde al modo configurado
pub fn build_handler(mode: ServeMode) -> Arc<dyn RequestHandler> {
    match mode {
        ServeMode::Files(root) => Arc::new(FileHandler::new(root)),
        ServeMode::Proxy(target) => Arc::new(ProxyHandler::new(target)),
    }
}

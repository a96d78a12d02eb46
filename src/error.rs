//! # Errores del Servidor
//! src/error.rs
//!
//! Tipos de error de configuración y de arranque. Los errores de protocolo
//! viven en `http::request::ParseError`; los handlers solo devuelven
//! `io::Error` porque cualquier otro fallo se convierte en una respuesta HTTP.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errores al construir o validar la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No se indicó ni `--files` ni `--proxy`
    #[error("either --files <DIR> or --proxy <HOST:PORT> must be given")]
    MissingMode,

    /// Se indicaron ambos modos a la vez
    #[error("--files and --proxy are mutually exclusive")]
    ConflictingModes,

    /// La raíz servida no existe o no es un directorio
    #[error("served root '{}' is not a directory", .0.display())]
    InvalidServedRoot(PathBuf),

    /// Destino de proxy malformado
    #[error("invalid proxy target '{target}': {reason}")]
    InvalidProxyTarget { target: String, reason: String },
}

/// Errores fatales del servidor (arranque o socket de escucha)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// No se pudo crear un thread del pool
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

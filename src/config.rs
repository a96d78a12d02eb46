//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor con soporte para
//! argumentos CLI y variables de entorno. Se construye una sola vez en
//! `main` y después ningún componente la modifica.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./httpserver --files www/ --port 8000 --num-threads 5
//! ./httpserver --proxy inst.eecs.berkeley.edu:80 --port 8000 --num-threads 15
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_FILES=./www HTTP_PORT=8000 NUM_THREADS=4 ./httpserver
//! ```

use crate::error::ConfigError;
use clap::{ArgGroup, Parser};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Puerto del destino cuando `--proxy` no lo indica
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// Threads que consume cada conexión proxy activa: el worker y dos relays
pub const THREADS_PER_PROXY_CONNECTION: usize = 3;

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "httpserver")]
#[command(about = "Servidor HTTP/1.0 concurrente: archivos estáticos o proxy TCP")]
#[command(version = "0.1.0")]
#[command(group(ArgGroup::new("mode").required(true).args(["files", "proxy"])))]
pub struct Config {
    /// Directorio raíz desde el que se sirven archivos
    #[arg(long, value_name = "DIR", env = "HTTP_FILES")]
    pub files: Option<PathBuf>,

    /// Destino al que se reenvían las conexiones (host o host:puerto)
    #[arg(long, value_name = "HOST[:PORT]", env = "HTTP_PROXY_TARGET")]
    pub proxy: Option<ProxyTarget>,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8000", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Threads disponibles para atender conexiones (0 = sin pool, todo en el
    /// thread que acepta). En modo proxy se divide entre 3.
    #[arg(long = "num-threads", default_value = "0", env = "NUM_THREADS")]
    pub num_threads: usize,
}

/// Modo de servicio, elegido una sola vez al arrancar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeMode {
    /// Servir archivos bajo este directorio
    Files(PathBuf),

    /// Reenviar bytes hacia este destino
    Proxy(ProxyTarget),
}

/// Destino del proxy: (hostname, puerto)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub host: String,
    pub port: u16,
}

impl ProxyTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl FromStr for ProxyTarget {
    type Err = ConfigError;

    /// Acepta `host:puerto`, solo `host` (puerto 80) o `[ipv6]:puerto`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidProxyTarget {
            target: s.to_string(),
            reason: reason.to_string(),
        };

        let parse_port =
            |port: &str| port.parse::<u16>().map_err(|_| invalid("port must be a number 1-65535"));

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            // IPv6 literal: [::1] o [::1]:8080
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| invalid("unterminated '[' in IPv6 literal"))?;
            let port = match after {
                "" => DEFAULT_PROXY_PORT,
                _ => match after.strip_prefix(':') {
                    Some(port) => parse_port(port)?,
                    None => return Err(invalid("expected ':port' after ']'")),
                },
            };
            (host, port)
        } else {
            match s.split_once(':') {
                Some((_, rest)) if rest.contains(':') => {
                    return Err(invalid("IPv6 literals must be written as [addr]:port"))
                }
                Some((host, port)) => (host, parse_port(port)?),
                None => (s, DEFAULT_PROXY_PORT),
            }
        };

        if host.is_empty() {
            return Err(invalid("missing hostname"));
        }
        if port == 0 {
            return Err(invalid("port must be a number 1-65535"));
        }

        Ok(ProxyTarget::new(host, port))
    }
}

impl fmt::Display for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use httpserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Devuelve el modo de servicio; exactamente uno de `files`/`proxy`
    /// debe estar presente
    pub fn mode(&self) -> Result<ServeMode, ConfigError> {
        match (&self.files, &self.proxy) {
            (Some(root), None) => Ok(ServeMode::Files(root.clone())),
            (None, Some(target)) => Ok(ServeMode::Proxy(target.clone())),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingModes),
            (None, None) => Err(ConfigError::MissingMode),
        }
    }

    /// Número de workers del pool
    ///
    /// En modo proxy cada conexión ocupa un worker más dos threads de relay,
    /// así que `--num-threads` se reparte de a tres.
    pub fn worker_count(&self) -> usize {
        if self.proxy.is_some() {
            self.num_threads / THREADS_PER_PROXY_CONNECTION
        } else {
            self.num_threads
        }
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ServeMode::Files(root) = self.mode()? {
            if !root.is_dir() {
                return Err(ConfigError::InvalidServedRoot(root));
            }
        }
        Ok(())
    }

    /// Registra un resumen de la configuración efectiva
    pub fn print_summary(&self) {
        info!("🌐 Dirección:  {}", self.address());
        match self.mode() {
            Ok(ServeMode::Files(root)) => info!("📁 Modo:       archivos desde {}", root.display()),
            Ok(ServeMode::Proxy(target)) => info!("🔀 Modo:       proxy hacia {}", target),
            Err(e) => info!("⚠️  Modo:       inválido ({})", e),
        }
        match self.worker_count() {
            0 => info!("👷 Workers:    0 (atención en el thread que acepta)"),
            n => info!("👷 Workers:    {} (de {} threads)", n, self.num_threads),
        }
    }
}

impl Default for Config {
    /// Configuración por defecto (sin modo: hay que indicar files o proxy)
    fn default() -> Self {
        Self {
            files: None,
            proxy: None,
            port: 8000,
            host: "0.0.0.0".to_string(),
            num_threads: 0,
        }
    }
}

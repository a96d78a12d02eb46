//! # HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 concurrente con un pool fijo de workers. Cada conexión
//! aceptada pasa por una cola compartida y la atiende uno de dos handlers:
//! un servidor de archivos estáticos o un proxy TCP transparente.
//!
//! ## Arquitectura
//!
//! ```text
//! accept → ConnectionQueue → worker → { FileHandler | ProxyHandler } → cliente
//! ```
//!
//! - `config`: Argumentos CLI / variables de entorno
//! - `error`: Errores de configuración y arranque
//! - `http`: Parsing de requests y escritura de respuestas HTTP/1.0
//! - `server`: Socket de escucha, cola de conexiones y pool de workers
//! - `handlers`: Handler de archivos y handler de proxy
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use httpserver::config::Config;
//! use httpserver::server::Server;
//!
//! let mut config = Config::default();
//! config.files = Some("./www".into());
//! config.num_threads = 4;
//!
//! let server = Server::new(config).expect("configuración inválida");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod server;

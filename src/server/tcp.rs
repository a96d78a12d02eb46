//! # Servidor TCP
//! src/server/tcp.rs
//!
//! El thread que acepta es dueño del socket de escucha durante toda la vida
//! del proceso. Cada conexión aceptada se despacha según el tamaño del pool:
//!
//! ```text
//! workers = 0  →  el handler corre en este mismo thread (serie)
//! workers > 0  →  push a la cola; algún worker la atiende
//! ```
//!
//! Un error en `accept` se registra y el loop sigue.

use super::pool::{serve_connection, WorkerPool};
use super::queue::ConnectionQueue;
use crate::config::Config;
use crate::error::ServerError;
use crate::handlers::{self, RequestHandler};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Servidor HTTP/1.0 concurrente
pub struct Server {
    config: Config,
    handler: Arc<dyn RequestHandler>,
}

impl Server {
    /// Crea el servidor con el handler que corresponde al modo configurado
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let handler = handlers::build_handler(config.mode()?);
        Ok(Self::with_handler(config, handler))
    }

    /// Crea el servidor con un handler arbitrario
    pub fn with_handler(config: Config, handler: Arc<dyn RequestHandler>) -> Self {
        Self { config, handler }
    }

    /// Abre el socket de escucha en `host:port`
    pub fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.address();
        TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            addr: address,
            source,
        })
    }

    /// Abre el socket y atiende conexiones para siempre
    pub fn run(self) -> Result<(), ServerError> {
        info!("[*] Iniciando servidor en {}", self.config.address());
        let listener = self.bind()?;
        self.serve(listener)
    }

    /// Atiende conexiones de un socket ya abierto
    pub fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        let dispatcher = Dispatcher::start(self.config.worker_count(), Arc::clone(&self.handler))?;

        info!("[+] Servidor escuchando en {}", local_addr);
        match &dispatcher {
            Dispatcher::Inline(_) => info!("[*] Sin pool: cada conexión se atiende en el thread que acepta"),
            Dispatcher::Pooled { pool, .. } => info!("[*] Pool de {} workers ({})", pool.size(), self.handler.name()),
        }

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => dispatcher.dispatch(stream),
                Err(e) => warn!("   ❌ Error al aceptar conexión: {}", e),
            }
        }

        Ok(())
    }
}

/// Camino que sigue cada conexión aceptada
enum Dispatcher {
    Inline(Arc<dyn RequestHandler>),
    Pooled {
        queue: Arc<ConnectionQueue<TcpStream>>,
        pool: WorkerPool,
    },
}

impl Dispatcher {
    fn start(workers: usize, handler: Arc<dyn RequestHandler>) -> Result<Self, ServerError> {
        if workers == 0 {
            return Ok(Dispatcher::Inline(handler));
        }

        let queue = Arc::new(ConnectionQueue::new());
        let pool = WorkerPool::spawn(workers, Arc::clone(&queue), handler)?;
        Ok(Dispatcher::Pooled { queue, pool })
    }

    fn dispatch(&self, stream: TcpStream) {
        if let Ok(peer) = stream.peer_addr() {
            info!(" ✅ Nueva conexión desde: {}", peer);
        }

        match self {
            Dispatcher::Inline(handler) => serve_connection(handler.as_ref(), stream),
            Dispatcher::Pooled { queue, .. } => {
                queue.push(stream);
                debug!("   📥 Conexiones en cola: {}", queue.len());
            }
        }
    }
}

//! # Pool de Workers
//! src/server/pool.rs
//!
//! Un número fijo de threads, creados al arrancar y nunca retirados. Cada
//! worker repite: sacar una conexión de la cola (bloqueando si está vacía),
//! entregarla al handler y volver por la siguiente. La conexión se cierra
//! cuando el handler la suelta.
//!
//! No hay apagado ordenado: los workers terminan con el proceso.

use super::queue::ConnectionQueue;
use crate::error::ServerError;
use crate::handlers::RequestHandler;
use std::net::TcpStream;
use std::process;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Pool de workers que drenan una `ConnectionQueue`
pub struct WorkerPool {
    /// Nunca se hace join: los workers viven lo que vive el proceso
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Lanza `size` workers ligados a `handler`
    pub fn spawn(
        size: usize,
        queue: Arc<ConnectionQueue<TcpStream>>,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<Self, ServerError> {
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let queue = Arc::clone(&queue);
            let handler = Arc::clone(&handler);

            let worker = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(&queue, handler.as_ref()))
                .map_err(ServerError::Spawn)?;

            workers.push(worker);
        }

        Ok(Self { workers })
    }

    /// Número de workers lanzados
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

fn worker_loop(queue: &ConnectionQueue<TcpStream>, handler: &dyn RequestHandler) {
    let _guard = AbortOnPanic;
    debug!("🔧 Worker iniciado");

    loop {
        let stream = queue.pop();
        serve_connection(handler, stream);
    }
}

/// Entrega una conexión al handler y registra el resultado
///
/// La usan tanto los workers como el thread que acepta cuando no hay pool.
pub fn serve_connection(handler: &dyn RequestHandler, stream: TcpStream) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("   👷 Atendiendo {} ({})", peer, handler.name());

    if let Err(e) = handler.handle(stream) {
        warn!("   ❌ Error atendiendo {}: {}", peer, e);
    }
}

/// Un pánico dentro de un worker termina el proceso completo
struct AbortOnPanic;

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            error!(
                "💥 Pánico en {}, abortando el proceso",
                thread::current().name().unwrap_or("worker")
            );
            process::abort();
        }
    }
}

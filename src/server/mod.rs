//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP:
//! 1. Escucha en un puerto y acepta conexiones
//! 2. Encola cada conexión en una cola FIFO compartida
//! 3. Un pool fijo de workers saca conexiones de la cola y las entrega al
//!    handler configurado
//!
//! Con 0 workers no hay cola: el thread que acepta atiende cada conexión.

pub mod pool;
pub mod queue;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use pool::WorkerPool;
pub use queue::ConnectionQueue;
pub use tcp::Server;

//! # Cola de Conexiones
//! src/server/queue.rs
//!
//! Cola FIFO thread-safe entre el thread que acepta y los workers.
//! `push` nunca bloquea (la cola no tiene límite); `pop` bloquea hasta que
//! haya un elemento. Ambas operaciones usan el mismo Mutex, y la espera usa
//! un Condvar asociado, así que no se pierden notificaciones ni se hace
//! busy-waiting.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Cola FIFO sin límite con `pop` bloqueante
pub struct ConnectionQueue<T> {
    items: Mutex<VecDeque<T>>,

    /// Se notifica en cada `push`
    not_empty: Condvar,
}

impl<T> ConnectionQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Encola al final y despierta a un worker en espera
    pub fn push(&self, item: T) {
        let mut items = self.lock();
        items.push_back(item);
        self.not_empty.notify_one();
    }

    /// Desencola el primer elemento
    ///
    /// Bloquea hasta que haya uno disponible
    pub fn pop(&self) -> T {
        let mut items = self.lock();

        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }

            items = self
                .not_empty
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Intenta desencolar sin bloquear
    pub fn try_pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Un panic con el lock tomado no deja la VecDeque inconsistente
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for ConnectionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

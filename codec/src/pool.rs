//! Reusable slot buffers for update application.
//!
//! Applying an update first collects the changed slot indices and only then
//! decodes values, so every update needs a scratch list. The pool hands out
//! those lists and takes them back cleared, keeping their capacity, so that
//! steady-state decoding does not allocate.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::config::PoolConfig;

/// Thread-safe pool of slot buffers.
///
/// Share one pool between any number of entities or parsing sessions, on any
/// number of threads (wrap it in an `Arc` to share across threads). Each
/// buffer has exactly one holder at a time.
#[derive(Debug, Default)]
pub struct UpdateBufferPool {
    free: Mutex<Vec<Vec<usize>>>,
    config: PoolConfig,
    created: AtomicUsize,
}

impl UpdateBufferPool {
    /// Creates an empty pool with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty pool with the given configuration.
    #[must_use]
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(config.max_retained)),
            config,
            created: AtomicUsize::new(0),
        }
    }

    /// Returns the pool configuration.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Takes an empty buffer from the pool, creating one if none is idle.
    pub fn acquire(&self) -> UpdateBuffer<'_> {
        let reused = self.free.lock().pop();
        let slots = reused.unwrap_or_else(|| {
            let created = self.created.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                created,
                capacity = self.config.initial_capacity,
                "update buffer pool grew"
            );
            Vec::with_capacity(self.config.initial_capacity)
        });
        UpdateBuffer { pool: self, slots }
    }

    /// Returns a buffer to the pool.
    ///
    /// Equivalent to dropping the buffer; provided to make the hand-back explicit.
    pub fn release(&self, buffer: UpdateBuffer<'_>) {
        debug_assert!(std::ptr::eq(buffer.pool, self), "buffer from another pool");
        drop(buffer);
    }

    /// Number of idle buffers currently held by the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    /// Number of buffers the pool has allocated over its lifetime.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    fn put_back(&self, mut slots: Vec<usize>) {
        slots.clear();
        let mut free = self.free.lock();
        if free.len() < self.config.max_retained {
            free.push(slots);
        }
    }
}

/// An exclusively held slot buffer, returned to its pool on drop.
#[derive(Debug)]
pub struct UpdateBuffer<'p> {
    pool: &'p UpdateBufferPool,
    slots: Vec<usize>,
}

impl Deref for UpdateBuffer<'_> {
    type Target = Vec<usize>;

    fn deref(&self) -> &Self::Target {
        &self.slots
    }
}

impl DerefMut for UpdateBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.slots
    }
}

impl Drop for UpdateBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put_back(std::mem::take(&mut self.slots));
    }
}

//! Bounded pool of reusable [`Writer`]s.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace};

use crate::writer::{Writer, DEFAULT_CAPACITY};

/// Sizing knobs for a [`WriterPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Maximum number of idle writers kept for reuse.
    pub max_pooled: usize,
    /// Writers whose capacity grew beyond this are dropped on release.
    pub max_retained_capacity: usize,
    /// Capacity of writers created when the pool is empty.
    pub initial_capacity: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_pooled: 8,
            max_retained_capacity: 1024 * 1024,
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl PoolOptions {
    pub fn with_max_pooled(mut self, max_pooled: usize) -> Self {
        self.max_pooled = max_pooled;
        self
    }

    pub fn with_max_retained_capacity(mut self, capacity: usize) -> Self {
        self.max_retained_capacity = capacity;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

/// A bounded pool of writers shared across encode calls.
///
/// Acquire and release are guarded by a mutex, so one pool can serve
/// encoders running on several threads at once.
///
/// # Example
///
/// ```
/// use bencode_buffers::WriterPool;
///
/// let pool = WriterPool::default();
/// {
///     let mut writer = pool.acquire();
///     writer.ascii("le").unwrap();
///     assert_eq!(writer.as_slice(), b"le");
/// }
/// assert_eq!(pool.idle(), 1);
/// assert!(pool.acquire().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct WriterPool {
    options: PoolOptions,
    idle: Mutex<Vec<Writer>>,
}

impl WriterPool {
    pub fn new(options: PoolOptions) -> Self {
        Self {
            options,
            idle: Mutex::new(Vec::with_capacity(options.max_pooled)),
        }
    }

    pub fn options(&self) -> &PoolOptions {
        &self.options
    }

    /// Number of idle writers currently held.
    pub fn idle(&self) -> usize {
        self.slots().len()
    }

    /// Takes a writer out of the pool, allocating a fresh one if none is idle.
    ///
    /// The writer goes back to the pool when the guard is dropped.
    pub fn acquire(&self) -> PooledWriter<'_> {
        PooledWriter {
            pool: self,
            writer: self.take(),
            detached: false,
        }
    }

    /// Takes a writer out of the pool without a release guard.
    pub fn take(&self) -> Writer {
        match self.slots().pop() {
            Some(writer) => writer,
            None => {
                trace!(capacity = self.options.initial_capacity, "allocating writer");
                Writer::with_capacity(self.options.initial_capacity)
            }
        }
    }

    /// Resets `writer` and returns it to the pool.
    ///
    /// Oversized writers, and writers arriving while the pool is full, are dropped.
    pub fn release(&self, mut writer: Writer) {
        if writer.capacity() > self.options.max_retained_capacity {
            debug!(
                capacity = writer.capacity(),
                limit = self.options.max_retained_capacity,
                "dropping oversized writer"
            );
            return;
        }
        writer.reset();
        let mut slots = self.slots();
        if slots.len() < self.options.max_pooled {
            slots.push(writer);
        }
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, Vec<Writer>> {
        // A panic while holding the lock cannot leave a writer half-pushed.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A [`Writer`] on loan from a [`WriterPool`].
#[derive(Debug)]
pub struct PooledWriter<'a> {
    pool: &'a WriterPool,
    writer: Writer,
    detached: bool,
}

impl PooledWriter<'_> {
    /// Detaches the writer from the pool.
    pub fn into_inner(mut self) -> Writer {
        self.detached = true;
        std::mem::replace(&mut self.writer, Writer::with_capacity(0))
    }
}

impl Deref for PooledWriter<'_> {
    type Target = Writer;

    fn deref(&self) -> &Writer {
        &self.writer
    }
}

impl DerefMut for PooledWriter<'_> {
    fn deref_mut(&mut self) -> &mut Writer {
        &mut self.writer
    }
}

impl Drop for PooledWriter<'_> {
    fn drop(&mut self) {
        if !self.detached {
            let writer = std::mem::replace(&mut self.writer, Writer::with_capacity(0));
            self.pool.release(writer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuses_released_writer() {
        let pool = WriterPool::new(PoolOptions::default().with_initial_capacity(32));
        let mut writer = pool.take();
        writer.buf(&[1u8; 100]).unwrap();
        let grown = writer.capacity();
        pool.release(writer);
        assert_eq!(pool.idle(), 1);

        let writer = pool.take();
        assert!(writer.is_empty());
        assert_eq!(writer.capacity(), grown);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_drops_oversized_writer() {
        let pool = WriterPool::new(
            PoolOptions::default()
                .with_initial_capacity(16)
                .with_max_retained_capacity(64),
        );
        let mut writer = pool.take();
        writer.buf(&[0u8; 256]).unwrap();
        pool.release(writer);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_bounded_idle_count() {
        let pool = WriterPool::new(PoolOptions::default().with_max_pooled(2));
        let writers: Vec<_> = (0..5).map(|_| pool.take()).collect();
        for writer in writers {
            pool.release(writer);
        }
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_guard_returns_on_drop() {
        let pool = WriterPool::default();
        {
            let mut guard = pool.acquire();
            guard.u8(b'd').unwrap();
            guard.u8(b'e').unwrap();
        }
        assert_eq!(pool.idle(), 1);
        let detached = pool.acquire().into_inner();
        assert!(detached.is_empty());
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let pool = std::sync::Arc::new(WriterPool::new(PoolOptions::default().with_max_pooled(4)));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    let mut writer = pool.acquire();
                    writer.u64(i).unwrap();
                    writer.len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
        assert!(pool.idle() <= 4);
    }
}

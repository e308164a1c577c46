use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::ops::Deref;
use std::sync::{Mutex, OnceLock, PoisonError};

// -----------------------------------------------------------------------------
// BufferPool

/// Number of idle stores kept by [`BufferPool::shared`].
const SHARED_RETAINED: usize = 32;

struct PoolInner {
    idle: Mutex<Vec<Vec<u8>>>,
    max_retained: usize,
}

/// A pool of reusable byte stores.
///
/// [`rent`](Self::rent) hands out a [`PooledBytes`] that goes back to the
/// pool when dropped, so storage is released on every exit path, including
/// early returns through `?`.
///
/// The pool is shared between threads; individual stores are not.
///
/// # Examples
///
/// ```
/// use crunchy_buffer::{BufferPool, ByteWriter};
///
/// let pool = BufferPool::new(4);
/// {
///     let mut writer = ByteWriter::pooled(&pool);
///     writer.write_u32(7);
///     assert_eq!(pool.idle(), 0);
/// }
/// assert_eq!(pool.idle(), 1);
/// ```
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

impl BufferPool {
    /// Creates a pool that keeps at most `max_retained` idle stores.
    pub fn new(max_retained: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(Vec::new()),
                max_retained,
            }),
        }
    }

    /// The process-wide pool.
    pub fn shared() -> &'static BufferPool {
        static SHARED: OnceLock<BufferPool> = OnceLock::new();
        SHARED.get_or_init(|| BufferPool::new(SHARED_RETAINED))
    }

    /// Takes an empty store with at least `min_capacity` bytes reserved.
    pub fn rent(&self, min_capacity: usize) -> PooledBytes {
        let reused = self
            .inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let mut bytes = reused.unwrap_or_default();
        bytes.reserve(min_capacity);
        log::trace!("rented pooled store, capacity {}", bytes.capacity());

        PooledBytes {
            bytes,
            pool: Arc::clone(&self.inner),
        }
    }

    /// Number of idle stores waiting to be rented.
    pub fn idle(&self) -> usize {
        self.inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Debug for BufferPool {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .field("max_retained", &self.inner.max_retained)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// PooledBytes

/// A byte store rented from a [`BufferPool`].
///
/// Dropping it clears the bytes and returns the allocation to the pool.
pub struct PooledBytes {
    bytes: Vec<u8>,
    pool: Arc<PoolInner>,
}

impl PooledBytes {
    #[inline]
    pub fn as_vec_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }
}

impl Deref for PooledBytes {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl Drop for PooledBytes {
    fn drop(&mut self) {
        let mut bytes = core::mem::take(&mut self.bytes);
        bytes.clear();

        let mut idle = self.pool.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.pool.max_retained {
            idle.push(bytes);
        } else {
            log::warn!(
                "buffer pool full ({} idle), discarding store of capacity {}",
                idle.len(),
                bytes.capacity(),
            );
        }
    }
}

impl Debug for PooledBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PooledBytes")
            .field("len", &self.bytes.len())
            .field("capacity", &self.bytes.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::BufferPool;
    use crate::{ByteBuffer, DecodeError};

    #[test]
    fn store_returns_on_drop() {
        let pool = BufferPool::new(2);
        let a = pool.rent(16);
        let b = pool.rent(16);
        assert_eq!(pool.idle(), 0);
        drop(a);
        assert_eq!(pool.idle(), 1);
        drop(b);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn reused_store_is_empty() {
        let pool = BufferPool::new(1);
        let mut a = pool.rent(4);
        a.as_vec_mut().extend_from_slice(&[1, 2, 3]);
        let cap = a.capacity();
        drop(a);
        let b = pool.rent(0);
        assert!(b.is_empty());
        assert_eq!(b.capacity(), cap);
    }

    #[test]
    fn full_pool_discards() {
        let pool = BufferPool::new(1);
        let a = pool.rent(0);
        let b = pool.rent(0);
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn released_on_error_path() {
        fn read_past_end(pool: &BufferPool) -> Result<u64, DecodeError> {
            let mut buffer = ByteBuffer::pooled(pool, &[1, 2]);
            let value = buffer.read_u64()?;
            Ok(value)
        }

        let pool = BufferPool::new(4);
        assert!(read_past_end(&pool).is_err());
        assert_eq!(pool.idle(), 1);
    }
}

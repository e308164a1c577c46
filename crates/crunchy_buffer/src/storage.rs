use alloc::vec::Vec;

#[cfg(feature = "std")]
use crate::pool::PooledBytes;

/// Backing bytes of a writer or buffer.
pub(crate) enum Storage {
    Owned(Vec<u8>),
    #[cfg(feature = "std")]
    Pooled(PooledBytes),
}

impl Storage {
    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            Storage::Owned(v) => v.as_slice(),
            #[cfg(feature = "std")]
            Storage::Pooled(p) => p.as_slice(),
        }
    }

    #[inline]
    pub(crate) fn vec_mut(&mut self) -> &mut Vec<u8> {
        match self {
            Storage::Owned(v) => v,
            #[cfg(feature = "std")]
            Storage::Pooled(p) => p.as_vec_mut(),
        }
    }

    /// Moves the bytes out. Pooled storage is copied and then released.
    pub(crate) fn into_vec(self) -> Vec<u8> {
        match self {
            Storage::Owned(v) => v,
            #[cfg(feature = "std")]
            Storage::Pooled(p) => p.to_vec(),
        }
    }
}

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use crate::storage::Storage;
use crate::{BoundsFault, DecodeError, Wire};

#[cfg(feature = "std")]
use crate::BufferPool;

// -----------------------------------------------------------------------------
// ByteBuffer

/// Owned bytes with a forward-only read cursor.
///
/// Every `read_*` has a `peek_*` twin that decodes the same value and leaves
/// the cursor in place. A failed read or peek never moves the cursor.
///
/// The cursor never passes the end of the buffer. Asking for more bytes than
/// remain returns [`BoundsFault`].
pub struct ByteBuffer {
    storage: Storage,
    position: usize,
}

macro_rules! impl_read_fixed {
    ($($ty:ty => $read:ident, $peek:ident;)*) => {$(
        #[doc = concat!("Reads a little-endian `", stringify!($ty), "`.")]
        #[inline]
        pub fn $read(&mut self) -> Result<$ty, BoundsFault> {
            self.take_array().map(<$ty>::from_le_bytes)
        }

        #[doc = concat!("Decodes a `", stringify!($ty), "` without advancing.")]
        #[inline]
        pub fn $peek(&mut self) -> Result<$ty, BoundsFault> {
            self.peeking(Self::$read)
        }
    )*};
}

impl ByteBuffer {
    /// Wraps `bytes`, positioned at the start.
    #[inline]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self::from_storage(Storage::Owned(bytes))
    }

    /// Copies `bytes` into a new buffer.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }

    /// Copies `bytes` into storage rented from `pool`.
    #[cfg(feature = "std")]
    pub fn pooled(pool: &BufferPool, bytes: &[u8]) -> Self {
        let mut store = pool.rent(bytes.len());
        store.as_vec_mut().extend_from_slice(bytes);
        Self::from_storage(Storage::Pooled(store))
    }

    #[inline]
    pub(crate) fn from_storage(storage: Storage) -> Self {
        Self {
            storage,
            position: 0,
        }
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes between the cursor and the end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len() - self.position
    }

    /// Whether the cursor has reached the end.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole buffer, read or not.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.bytes()
    }

    /// Takes the whole buffer back, dropping the cursor.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.storage.into_vec()
    }

    /// Checks that `requested` more bytes are available.
    #[inline]
    pub fn ensure(&self, requested: usize) -> Result<(), BoundsFault> {
        if requested > self.remaining() {
            Err(self.fault(requested))
        } else {
            Ok(())
        }
    }

    #[cold]
    #[inline(never)]
    fn fault(&self, requested: usize) -> BoundsFault {
        BoundsFault {
            position: self.position,
            requested,
            len: self.len(),
        }
    }

    fn take(&mut self, count: usize) -> Result<&[u8], BoundsFault> {
        self.ensure(count)?;
        let start = self.position;
        self.position += count;
        Ok(&self.storage.bytes()[start..self.position])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], BoundsFault> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Runs `read` and restores the cursor afterwards, whatever the outcome.
    #[inline]
    fn peeking<R>(&mut self, read: impl FnOnce(&mut Self) -> R) -> R {
        let position = self.position;
        let result = read(self);
        self.position = position;
        result
    }

    /// Advances the cursor by `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<(), BoundsFault> {
        self.take(count).map(|_| ())
    }

    /// Reads `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, BoundsFault> {
        self.take(count).map(<[u8]>::to_vec)
    }

    impl_read_fixed! {
        i8 => read_i8, peek_i8;
        u8 => read_u8, peek_u8;
        i16 => read_i16, peek_i16;
        u16 => read_u16, peek_u16;
        i32 => read_i32, peek_i32;
        u32 => read_u32, peek_u32;
        i64 => read_i64, peek_i64;
        u64 => read_u64, peek_u64;
    }

    /// Reads one byte; any nonzero value is `true`.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, BoundsFault> {
        self.read_u8().map(|b| b != 0)
    }

    #[inline]
    pub fn peek_bool(&mut self) -> Result<bool, BoundsFault> {
        self.peeking(Self::read_bool)
    }

    /// Reads one UTF-16 code unit as a `char`.
    ///
    /// A lone surrogate is [`DecodeError::InvalidChar`].
    pub fn read_char(&mut self) -> Result<char, DecodeError> {
        let unit = self.peek_u16()?;
        let value = char::from_u32(unit as u32).ok_or(DecodeError::InvalidChar(unit))?;
        self.position += 2;
        Ok(value)
    }

    #[inline]
    pub fn peek_char(&mut self) -> Result<char, DecodeError> {
        self.peeking(Self::read_char)
    }

    /// Reads a 4-byte length prefix.
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let len = self.peek_i32()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::NegativeLength(len))?;
        self.position += 4;
        Ok(len)
    }

    /// Reads an `i32` count of UTF-16 code units followed by the units.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let start = self.position;
        let result = self.read_string_inner();
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn read_string_inner(&mut self) -> Result<String, DecodeError> {
        let count = self.read_len()?;
        let bytes = self.take(count.saturating_mul(2))?;
        let units = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .collect::<Result<String, _>>()
            .map_err(|_| DecodeError::InvalidUtf16)
    }

    #[inline]
    pub fn peek_string(&mut self) -> Result<String, DecodeError> {
        self.peeking(Self::read_string)
    }

    /// Reports whether the next value is a string equal to `expected`.
    ///
    /// Never moves the cursor and never fails. Anything that does not decode
    /// as that exact string, including a truncated buffer, is `false`.
    pub fn next_is_string(&mut self, expected: &str) -> bool {
        self.peeking(|this| {
            let Ok(count) = this.read_len() else {
                return false;
            };
            if count != expected.encode_utf16().count() {
                return false;
            }
            let Ok(bytes) = this.take(count.saturating_mul(2)) else {
                return false;
            };
            bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .eq(expected.encode_utf16())
        })
    }

    /// Reads an `i32` element count followed by the elements.
    ///
    /// The count is checked against the remaining length before anything is
    /// allocated.
    pub fn read_array<T: Wire>(&mut self) -> Result<Vec<T>, DecodeError> {
        let start = self.position;
        let result = self.read_array_inner();
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn read_array_inner<T: Wire>(&mut self) -> Result<Vec<T>, DecodeError> {
        let count = self.read_len()?;
        self.ensure(count.saturating_mul(T::MIN_SIZE))?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    #[inline]
    pub fn peek_array<T: Wire>(&mut self) -> Result<Vec<T>, DecodeError> {
        self.peeking(Self::read_array::<T>)
    }

    /// Reads any [`Wire`] value.
    #[inline]
    pub fn read<T: Wire>(&mut self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    #[inline]
    pub fn peek<T: Wire>(&mut self) -> Result<T, DecodeError> {
        self.peeking(T::decode)
    }
}

impl Debug for ByteBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("position", &self.position)
            .field("len", &self.len())
            .finish()
    }
}

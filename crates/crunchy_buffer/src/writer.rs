use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use crate::reader::ByteBuffer;
use crate::storage::Storage;
use crate::{EncodeError, Wire};

#[cfg(feature = "std")]
use crate::BufferPool;

// -----------------------------------------------------------------------------
// ByteWriter

/// Append-only encoder.
///
/// Every fixed-width write is infallible. Only length prefixes and `char`
/// values can be rejected, see [`EncodeError`].
///
/// Call [`into_bytes`](Self::into_bytes) to take the encoded bytes, or
/// [`into_buffer`](Self::into_buffer) to read them back.
pub struct ByteWriter {
    storage: Storage,
}

macro_rules! impl_write_fixed {
    ($($ty:ty => $name:ident;)*) => {$(
        #[doc = concat!("Appends a little-endian `", stringify!($ty), "`.")]
        #[inline]
        pub fn $name(&mut self, value: $ty) {
            self.write_bytes(&value.to_le_bytes());
        }
    )*};
}

impl ByteWriter {
    /// Creates an empty writer.
    #[inline]
    pub const fn new() -> Self {
        Self {
            storage: Storage::Owned(Vec::new()),
        }
    }

    /// Creates an empty writer with `capacity` bytes reserved.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Storage::Owned(Vec::with_capacity(capacity)),
        }
    }

    /// Creates a writer that appends after `bytes`.
    #[inline]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            storage: Storage::Owned(bytes),
        }
    }

    /// Creates a writer backed by storage rented from `pool`.
    ///
    /// The storage goes back to the pool when the writer, or the buffer made
    /// from it by [`into_buffer`](Self::into_buffer), is dropped.
    #[cfg(feature = "std")]
    pub fn pooled(pool: &BufferPool) -> Self {
        Self {
            storage: Storage::Pooled(pool.rent(0)),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bytes written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.bytes()
    }

    /// Appends raw bytes with no length prefix.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.storage.vec_mut().extend_from_slice(bytes);
    }

    impl_write_fixed! {
        i8 => write_i8;
        u8 => write_u8;
        i16 => write_i16;
        u16 => write_u16;
        i32 => write_i32;
        u32 => write_u32;
        i64 => write_i64;
        u64 => write_u64;
    }

    /// Appends `1` for `true` and `0` for `false`.
    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    /// Appends a `char` as one UTF-16 code unit.
    ///
    /// Characters outside the Basic Multilingual Plane need a surrogate pair
    /// and are rejected.
    pub fn write_char(&mut self, value: char) -> Result<(), EncodeError> {
        let mut units = [0_u16; 2];
        match value.encode_utf16(&mut units) {
            [unit] => {
                self.write_u16(*unit);
                Ok(())
            }
            _ => Err(EncodeError::UnrepresentableChar(value)),
        }
    }

    /// Appends a string as an `i32` count of UTF-16 code units followed by
    /// the units.
    ///
    /// An empty string is a zero count and nothing else.
    ///
    /// ```
    /// use crunchy_buffer::ByteWriter;
    ///
    /// let mut writer = ByteWriter::new();
    /// writer.write_str("hi").unwrap();
    /// assert_eq!(writer.as_bytes(), [2, 0, 0, 0, b'h', 0, b'i', 0]);
    /// ```
    pub fn write_str(&mut self, value: &str) -> Result<(), EncodeError> {
        let count = value.encode_utf16().count();
        self.write_len(count)?;

        let bytes = self.storage.vec_mut();
        bytes.reserve(count * 2);
        for unit in value.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        Ok(())
    }

    /// Appends an `i32` element count followed by every element.
    ///
    /// ```
    /// use crunchy_buffer::ByteWriter;
    ///
    /// let mut writer = ByteWriter::new();
    /// writer.write_array(&[1_u8, 2, 3]).unwrap();
    /// assert_eq!(writer.as_bytes(), [3, 0, 0, 0, 1, 2, 3]);
    /// ```
    pub fn write_array<T: Wire>(&mut self, items: &[T]) -> Result<(), EncodeError> {
        self.write_len(items.len())?;
        items.iter().try_for_each(|item| item.encode(self))
    }

    /// Appends any [`Wire`] value.
    #[inline]
    pub fn write<T: Wire>(&mut self, value: &T) -> Result<(), EncodeError> {
        value.encode(self)
    }

    /// Appends a 4-byte length prefix.
    pub fn write_len(&mut self, len: usize) -> Result<(), EncodeError> {
        let len = i32::try_from(len).map_err(|_| EncodeError::LengthOverflow(len))?;
        self.write_i32(len);
        Ok(())
    }

    /// Takes the encoded bytes.
    ///
    /// Pooled storage is copied out and returned to its pool.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.storage.into_vec()
    }

    /// Turns the written bytes into a [`ByteBuffer`] positioned at the start.
    #[inline]
    pub fn into_buffer(self) -> ByteBuffer {
        ByteBuffer::from_storage(self.storage)
    }
}

impl Default for ByteWriter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ByteWriter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteWriter")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ByteWriter;
    use crate::EncodeError;
    use alloc::vec;

    #[test]
    fn int_is_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_i32(42);
        assert_eq!(writer.as_bytes(), 42_i32.to_le_bytes());

        let mut writer = ByteWriter::new();
        writer.write_u16(0x0102);
        writer.write_i64(-1);
        assert_eq!(writer.as_bytes(), [2, 1, 255, 255, 255, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn empty_string_writes_zero_count() {
        let mut writer = ByteWriter::new();
        writer.write_str("").unwrap();
        assert_eq!(writer.as_bytes(), [0, 0, 0, 0]);
    }

    #[test]
    fn string_counts_utf16_units() {
        let mut writer = ByteWriter::new();
        writer.write_str("é😀").unwrap();
        // one unit for 'é', a surrogate pair for the emoji
        assert_eq!(&writer.as_bytes()[..4], 3_i32.to_le_bytes());
        assert_eq!(writer.len(), 4 + 6);
    }

    #[test]
    fn char_outside_bmp_is_rejected() {
        let mut writer = ByteWriter::new();
        assert_eq!(writer.write_char('a'), Ok(()));
        assert_eq!(
            writer.write_char('😀'),
            Err(EncodeError::UnrepresentableChar('😀'))
        );
        assert_eq!(writer.as_bytes(), [b'a', 0]);
    }

    #[test]
    fn from_bytes_appends() {
        let mut writer = ByteWriter::from_bytes(vec![9]);
        writer.write_bool(true);
        writer.write_bool(false);
        assert_eq!(writer.into_bytes(), [9, 1, 0]);
    }

    #[test]
    fn string_array_layout() {
        let mut writer = ByteWriter::new();
        writer
            .write_array(&[alloc::string::String::from("a")])
            .unwrap();
        assert_eq!(writer.as_bytes(), [1, 0, 0, 0, 1, 0, 0, 0, b'a', 0]);
    }
}

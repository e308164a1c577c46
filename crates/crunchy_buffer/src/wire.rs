use alloc::string::String;

use crate::{ByteBuffer, ByteWriter, DecodeError, EncodeError};

/// A value with a fixed wire encoding.
///
/// Implemented for every scalar kind: the 8 to 64-bit integers, `bool`,
/// `char` and [`String`]. These are also the element types accepted by
/// [`ByteWriter::write_array`] and [`ByteBuffer::read_array`].
pub trait Wire: Sized {
    /// Fewest bytes one encoded value can take.
    const MIN_SIZE: usize;

    fn encode(&self, writer: &mut ByteWriter) -> Result<(), EncodeError>;

    fn decode(buffer: &mut ByteBuffer) -> Result<Self, DecodeError>;
}

macro_rules! impl_wire_fixed {
    ($($ty:ty => $write:ident, $read:ident;)*) => {$(
        impl Wire for $ty {
            const MIN_SIZE: usize = size_of::<$ty>();

            #[inline]
            fn encode(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
                writer.$write(*self);
                Ok(())
            }

            #[inline]
            fn decode(buffer: &mut ByteBuffer) -> Result<Self, DecodeError> {
                Ok(buffer.$read()?)
            }
        }
    )*};
}

impl_wire_fixed! {
    i8 => write_i8, read_i8;
    u8 => write_u8, read_u8;
    i16 => write_i16, read_i16;
    u16 => write_u16, read_u16;
    i32 => write_i32, read_i32;
    u32 => write_u32, read_u32;
    i64 => write_i64, read_i64;
    u64 => write_u64, read_u64;
    bool => write_bool, read_bool;
}

impl Wire for char {
    const MIN_SIZE: usize = 2;

    #[inline]
    fn encode(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
        writer.write_char(*self)
    }

    #[inline]
    fn decode(buffer: &mut ByteBuffer) -> Result<Self, DecodeError> {
        buffer.read_char()
    }
}

impl Wire for String {
    const MIN_SIZE: usize = 4;

    #[inline]
    fn encode(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
        writer.write_str(self)
    }

    #[inline]
    fn decode(buffer: &mut ByteBuffer) -> Result<Self, DecodeError> {
        buffer.read_string()
    }
}

use alloc::vec::Vec;

use crunchy_buffer::{ByteBuffer, ByteWriter, DecodeError, EncodeError};

use crate::construct::Construct;
use crate::member::Member;
use crate::scalar::{ScalarKind, ScalarType, ScalarValue, read_scalar, write_scalar};
use crate::SerializeError;

// -----------------------------------------------------------------------------
// ScalarSlot

/// Assignment target for a decoded scalar.
pub trait ScalarSlot {
    fn kind(&self) -> ScalarKind;

    fn assign(&mut self, value: ScalarValue) -> Result<(), SerializeError>;
}

impl<T: ScalarType> ScalarSlot for T {
    #[inline]
    fn kind(&self) -> ScalarKind {
        T::KIND
    }

    #[inline]
    fn assign(&mut self, value: ScalarValue) -> Result<(), SerializeError> {
        *self = T::from_scalar(value)?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Arrays

/// A sequence of scalars being written.
pub trait ArrayView {
    fn element_kind(&self) -> ScalarKind;

    fn len(&self) -> usize;

    /// Writes the count and then every element.
    fn encode(&self, writer: &mut ByteWriter) -> Result<(), EncodeError>;
}

/// A sequence of scalars being read.
pub trait ArraySlot {
    fn element_kind(&self) -> ScalarKind;

    /// Reads the count and the elements, replacing the current content.
    fn decode(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError>;
}

fn encode_elements<T: ScalarType>(items: &[T], writer: &mut ByteWriter) -> Result<(), EncodeError> {
    writer.write_len(items.len())?;
    items
        .iter()
        .try_for_each(|item| write_scalar(writer, item.to_scalar()))
}

fn decode_elements<T: ScalarType>(
    buffer: &mut ByteBuffer,
    expect: Option<usize>,
) -> Result<Vec<T>, SerializeError> {
    let count = buffer.read_len()?;
    if let Some(expect) = expect
        && expect != count
    {
        return Err(DecodeError::LengthMismatch {
            expect,
            actual: count,
        }
        .into());
    }
    buffer.ensure(count.saturating_mul(T::KIND.min_size()))?;

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::from_scalar(read_scalar(buffer, T::KIND)?)?);
    }
    Ok(items)
}

impl<T: ScalarType> ArrayView for Vec<T> {
    #[inline]
    fn element_kind(&self) -> ScalarKind {
        T::KIND
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn encode(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
        encode_elements(self, writer)
    }
}

impl<T: ScalarType> ArraySlot for Vec<T> {
    #[inline]
    fn element_kind(&self) -> ScalarKind {
        T::KIND
    }

    fn decode(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError> {
        *self = decode_elements(buffer, None)?;
        Ok(())
    }
}

impl<T: ScalarType, const N: usize> ArrayView for [T; N] {
    #[inline]
    fn element_kind(&self) -> ScalarKind {
        T::KIND
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn encode(&self, writer: &mut ByteWriter) -> Result<(), EncodeError> {
        encode_elements(self, writer)
    }
}

impl<T: ScalarType, const N: usize> ArraySlot for [T; N] {
    #[inline]
    fn element_kind(&self) -> ScalarKind {
        T::KIND
    }

    /// A count other than `N` is [`DecodeError::LengthMismatch`].
    fn decode(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError> {
        let items = decode_elements::<T>(buffer, Some(N))?;
        for (slot, item) in self.iter_mut().zip(items) {
            *slot = item;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// NullableSlot

/// A member that may hold no value.
pub trait NullableSlot {
    fn is_null(&self) -> bool;

    /// Makes the member null.
    fn clear(&mut self);

    /// Makes the member non-null, allocating a value if needed, and returns it.
    fn fill(&mut self) -> &mut dyn Member;
}

impl<T: Member + Construct + 'static> NullableSlot for Option<T> {
    #[inline]
    fn is_null(&self) -> bool {
        self.is_none()
    }

    #[inline]
    fn clear(&mut self) {
        *self = None;
    }

    fn fill(&mut self) -> &mut dyn Member {
        self.get_or_insert_with(T::allocate)
    }
}

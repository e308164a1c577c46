//! The closed set of scalar kinds and their wire dispatch.
//!
//! Every value the walker encodes directly is one of the [`ScalarKind`]s.
//! [`write_scalar`] and [`read_scalar`] are plain matches over that set.

use alloc::string::String;
use core::fmt::{Display, Formatter};

use crunchy_buffer::{ByteBuffer, ByteWriter, DecodeError, EncodeError};

use crate::SerializeError;

// -----------------------------------------------------------------------------
// Kinds

/// Underlying representation of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegralKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl IntegralKind {
    /// Encoded size in bytes.
    pub const fn size(self) -> usize {
        match self {
            IntegralKind::I8 | IntegralKind::U8 => 1,
            IntegralKind::I16 | IntegralKind::U16 => 2,
            IntegralKind::I32 | IntegralKind::U32 => 4,
            IntegralKind::I64 | IntegralKind::U64 => 8,
        }
    }
}

/// Every kind of value the primitive codec can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Char,
    Bool,
    String,
    /// An enumeration, encoded as its underlying integer with no tag.
    Enum(IntegralKind),
}

impl ScalarKind {
    /// Fewest bytes one encoded value can take.
    pub const fn min_size(self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 | ScalarKind::Bool => 1,
            ScalarKind::I16 | ScalarKind::U16 | ScalarKind::Char => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::String => 4,
            ScalarKind::I64 | ScalarKind::U64 => 8,
            ScalarKind::Enum(repr) => repr.size(),
        }
    }
}

impl From<IntegralKind> for ScalarKind {
    fn from(value: IntegralKind) -> Self {
        match value {
            IntegralKind::I8 => ScalarKind::I8,
            IntegralKind::U8 => ScalarKind::U8,
            IntegralKind::I16 => ScalarKind::I16,
            IntegralKind::U16 => ScalarKind::U16,
            IntegralKind::I32 => ScalarKind::I32,
            IntegralKind::U32 => ScalarKind::U32,
            IntegralKind::I64 => ScalarKind::I64,
            IntegralKind::U64 => ScalarKind::U64,
        }
    }
}

// -----------------------------------------------------------------------------
// Values

/// An integer tagged with its width and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegralValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
}

impl IntegralValue {
    pub const fn kind(self) -> IntegralKind {
        match self {
            IntegralValue::I8(_) => IntegralKind::I8,
            IntegralValue::U8(_) => IntegralKind::U8,
            IntegralValue::I16(_) => IntegralKind::I16,
            IntegralValue::U16(_) => IntegralKind::U16,
            IntegralValue::I32(_) => IntegralKind::I32,
            IntegralValue::U32(_) => IntegralKind::U32,
            IntegralValue::I64(_) => IntegralKind::I64,
            IntegralValue::U64(_) => IntegralKind::U64,
        }
    }

    fn write(self, writer: &mut ByteWriter) {
        match self {
            IntegralValue::I8(v) => writer.write_i8(v),
            IntegralValue::U8(v) => writer.write_u8(v),
            IntegralValue::I16(v) => writer.write_i16(v),
            IntegralValue::U16(v) => writer.write_u16(v),
            IntegralValue::I32(v) => writer.write_i32(v),
            IntegralValue::U32(v) => writer.write_u32(v),
            IntegralValue::I64(v) => writer.write_i64(v),
            IntegralValue::U64(v) => writer.write_u64(v),
        }
    }

    fn read(kind: IntegralKind, buffer: &mut ByteBuffer) -> Result<Self, DecodeError> {
        Ok(match kind {
            IntegralKind::I8 => IntegralValue::I8(buffer.read_i8()?),
            IntegralKind::U8 => IntegralValue::U8(buffer.read_u8()?),
            IntegralKind::I16 => IntegralValue::I16(buffer.read_i16()?),
            IntegralKind::U16 => IntegralValue::U16(buffer.read_u16()?),
            IntegralKind::I32 => IntegralValue::I32(buffer.read_i32()?),
            IntegralKind::U32 => IntegralValue::U32(buffer.read_u32()?),
            IntegralKind::I64 => IntegralValue::I64(buffer.read_i64()?),
            IntegralKind::U64 => IntegralValue::U64(buffer.read_u64()?),
        })
    }
}

impl Display for IntegralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            IntegralValue::I8(v) => write!(f, "{v}_i8"),
            IntegralValue::U8(v) => write!(f, "{v}_u8"),
            IntegralValue::I16(v) => write!(f, "{v}_i16"),
            IntegralValue::U16(v) => write!(f, "{v}_u16"),
            IntegralValue::I32(v) => write!(f, "{v}_i32"),
            IntegralValue::U32(v) => write!(f, "{v}_u32"),
            IntegralValue::I64(v) => write!(f, "{v}_i64"),
            IntegralValue::U64(v) => write!(f, "{v}_u64"),
        }
    }
}

/// A borrowed scalar about to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar<'a> {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Char(char),
    Bool(bool),
    String(&'a str),
    Enum(IntegralValue),
}

impl Scalar<'_> {
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::Char(_) => ScalarKind::Char,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::String(_) => ScalarKind::String,
            Scalar::Enum(v) => ScalarKind::Enum(v.kind()),
        }
    }
}

/// An owned scalar that was just read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Char(char),
    Bool(bool),
    String(String),
    Enum(IntegralValue),
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::I8(_) => ScalarKind::I8,
            ScalarValue::U8(_) => ScalarKind::U8,
            ScalarValue::I16(_) => ScalarKind::I16,
            ScalarValue::U16(_) => ScalarKind::U16,
            ScalarValue::I32(_) => ScalarKind::I32,
            ScalarValue::U32(_) => ScalarKind::U32,
            ScalarValue::I64(_) => ScalarKind::I64,
            ScalarValue::U64(_) => ScalarKind::U64,
            ScalarValue::Char(_) => ScalarKind::Char,
            ScalarValue::Bool(_) => ScalarKind::Bool,
            ScalarValue::String(_) => ScalarKind::String,
            ScalarValue::Enum(v) => ScalarKind::Enum(v.kind()),
        }
    }
}

// -----------------------------------------------------------------------------
// Dispatch

/// Writes one scalar.
///
/// Enumerations write exactly the bytes of their underlying integer.
pub fn write_scalar(writer: &mut ByteWriter, value: Scalar<'_>) -> Result<(), EncodeError> {
    match value {
        Scalar::I8(v) => writer.write_i8(v),
        Scalar::U8(v) => writer.write_u8(v),
        Scalar::I16(v) => writer.write_i16(v),
        Scalar::U16(v) => writer.write_u16(v),
        Scalar::I32(v) => writer.write_i32(v),
        Scalar::U32(v) => writer.write_u32(v),
        Scalar::I64(v) => writer.write_i64(v),
        Scalar::U64(v) => writer.write_u64(v),
        Scalar::Char(v) => return writer.write_char(v),
        Scalar::Bool(v) => writer.write_bool(v),
        Scalar::String(v) => return writer.write_str(v),
        Scalar::Enum(v) => v.write(writer),
    }
    Ok(())
}

/// Reads one scalar of the given kind.
pub fn read_scalar(buffer: &mut ByteBuffer, kind: ScalarKind) -> Result<ScalarValue, DecodeError> {
    Ok(match kind {
        ScalarKind::I8 => ScalarValue::I8(buffer.read_i8()?),
        ScalarKind::U8 => ScalarValue::U8(buffer.read_u8()?),
        ScalarKind::I16 => ScalarValue::I16(buffer.read_i16()?),
        ScalarKind::U16 => ScalarValue::U16(buffer.read_u16()?),
        ScalarKind::I32 => ScalarValue::I32(buffer.read_i32()?),
        ScalarKind::U32 => ScalarValue::U32(buffer.read_u32()?),
        ScalarKind::I64 => ScalarValue::I64(buffer.read_i64()?),
        ScalarKind::U64 => ScalarValue::U64(buffer.read_u64()?),
        ScalarKind::Char => ScalarValue::Char(buffer.read_char()?),
        ScalarKind::Bool => ScalarValue::Bool(buffer.read_bool()?),
        ScalarKind::String => ScalarValue::String(buffer.read_string()?),
        ScalarKind::Enum(repr) => ScalarValue::Enum(IntegralValue::read(repr, buffer)?),
    })
}

// -----------------------------------------------------------------------------
// ScalarType

/// A Rust type that maps onto exactly one [`ScalarKind`].
///
/// Implemented for the integers, `char`, `bool` and [`String`].
/// `#[derive(ScalarEnum)]` implements it for field-less enums.
pub trait ScalarType: Sized + 'static {
    const KIND: ScalarKind;

    fn to_scalar(&self) -> Scalar<'_>;

    fn from_scalar(value: ScalarValue) -> Result<Self, SerializeError>;
}

#[cold]
#[inline(never)]
fn kind_mismatch(expect: ScalarKind, found: &ScalarValue) -> SerializeError {
    SerializeError::KindMismatch {
        expect,
        found: found.kind(),
    }
}

macro_rules! impl_scalar_type {
    ($($ty:ty => $variant:ident;)*) => {$(
        impl ScalarType for $ty {
            const KIND: ScalarKind = ScalarKind::$variant;

            #[inline]
            fn to_scalar(&self) -> Scalar<'_> {
                Scalar::$variant(*self)
            }

            #[inline]
            fn from_scalar(value: ScalarValue) -> Result<Self, SerializeError> {
                match value {
                    ScalarValue::$variant(v) => Ok(v),
                    other => Err(kind_mismatch(Self::KIND, &other)),
                }
            }
        }
    )*};
}

impl_scalar_type! {
    i8 => I8;
    u8 => U8;
    i16 => I16;
    u16 => U16;
    i32 => I32;
    u32 => U32;
    i64 => I64;
    u64 => U64;
    char => Char;
    bool => Bool;
}

impl ScalarType for String {
    const KIND: ScalarKind = ScalarKind::String;

    #[inline]
    fn to_scalar(&self) -> Scalar<'_> {
        Scalar::String(self)
    }

    #[inline]
    fn from_scalar(value: ScalarValue) -> Result<Self, SerializeError> {
        match value {
            ScalarValue::String(v) => Ok(v),
            other => Err(kind_mismatch(Self::KIND, &other)),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarEnum

/// A field-less enumeration encoded as its `#[repr]` integer.
///
/// Usually derived:
///
/// ```
/// use crunchy_serialize::{ScalarEnum, IntegralValue};
///
/// #[derive(ScalarEnum, Debug, PartialEq)]
/// #[repr(u16)]
/// enum Tier {
///     Free = 1,
///     Paid = 40,
/// }
///
/// assert_eq!(Tier::Paid.to_repr(), IntegralValue::U16(40));
/// assert_eq!(Tier::from_repr(IntegralValue::U16(1)), Some(Tier::Free));
/// assert_eq!(Tier::from_repr(IntegralValue::U16(2)), None);
/// ```
pub trait ScalarEnum: Sized + 'static {
    const REPR: IntegralKind;

    fn to_repr(&self) -> IntegralValue;

    /// Returns `None` for values that name no variant.
    fn from_repr(value: IntegralValue) -> Option<Self>;
}

/// [`ScalarType::from_scalar`] for a [`ScalarEnum`].
pub fn enum_from_scalar<E: ScalarEnum>(
    value: ScalarValue,
    type_path: &'static str,
) -> Result<E, SerializeError> {
    match value {
        ScalarValue::Enum(repr) if repr.kind() == E::REPR => {
            E::from_repr(repr).ok_or(SerializeError::UnknownDiscriminant {
                type_path,
                value: repr,
            })
        }
        other => Err(kind_mismatch(ScalarKind::Enum(E::REPR), &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn round_trip(value: Scalar<'_>) -> ScalarValue {
        let mut writer = ByteWriter::new();
        write_scalar(&mut writer, value).unwrap();
        let mut buffer = writer.into_buffer();
        let out = read_scalar(&mut buffer, value.kind()).unwrap();
        assert!(buffer.is_exhausted());
        out
    }

    #[test]
    fn every_kind_round_trips() {
        assert_eq!(round_trip(Scalar::I8(i8::MIN)), ScalarValue::I8(i8::MIN));
        assert_eq!(round_trip(Scalar::U8(u8::MAX)), ScalarValue::U8(u8::MAX));
        assert_eq!(round_trip(Scalar::I16(-1)), ScalarValue::I16(-1));
        assert_eq!(round_trip(Scalar::U16(0)), ScalarValue::U16(0));
        assert_eq!(round_trip(Scalar::I32(i32::MAX)), ScalarValue::I32(i32::MAX));
        assert_eq!(round_trip(Scalar::U32(u32::MAX)), ScalarValue::U32(u32::MAX));
        assert_eq!(round_trip(Scalar::I64(i64::MIN)), ScalarValue::I64(i64::MIN));
        assert_eq!(round_trip(Scalar::U64(u64::MAX)), ScalarValue::U64(u64::MAX));
        assert_eq!(round_trip(Scalar::Char('Ω')), ScalarValue::Char('Ω'));
        assert_eq!(round_trip(Scalar::Bool(true)), ScalarValue::Bool(true));
        assert_eq!(
            round_trip(Scalar::String("crunch")),
            ScalarValue::String("crunch".to_string())
        );
    }

    #[test]
    fn enum_writes_only_underlying_bytes() {
        for value in [
            IntegralValue::I8(-2),
            IntegralValue::U8(200),
            IntegralValue::I16(-300),
            IntegralValue::U16(60000),
            IntegralValue::I32(-70000),
            IntegralValue::U32(4_000_000_000),
            IntegralValue::I64(i64::MIN),
            IntegralValue::U64(u64::MAX),
        ] {
            let mut writer = ByteWriter::new();
            write_scalar(&mut writer, Scalar::Enum(value)).unwrap();
            assert_eq!(writer.len(), value.kind().size());
            assert_eq!(round_trip(Scalar::Enum(value)), ScalarValue::Enum(value));
        }
    }

    #[test]
    fn from_scalar_checks_kind() {
        assert_eq!(u16::from_scalar(ScalarValue::U16(9)).unwrap(), 9);
        let err = u16::from_scalar(ScalarValue::I16(9)).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::KindMismatch {
                expect: ScalarKind::U16,
                found: ScalarKind::I16
            }
        ));
    }

    #[test]
    fn min_sizes() {
        assert_eq!(ScalarKind::Enum(IntegralKind::U32).min_size(), 4);
        assert_eq!(ScalarKind::String.min_size(), 4);
        assert_eq!(ScalarKind::Char.min_size(), 2);
        assert_eq!(ScalarKind::from(IntegralKind::I64), ScalarKind::I64);
    }
}

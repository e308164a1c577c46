//! The manual codec contract.
//!
//! A [`Serializable`] type owns its encoding. The walker never looks inside
//! it; recursion stops at the contract boundary. This is the way out for
//! types the walker cannot handle, such as graphs with cycles.

use core::fmt::{Debug, Formatter};

use crunchy_buffer::{ByteBuffer, ByteWriter};

use crate::SerializeError;
use crate::construct::{Construct, ConstructionHint};

// -----------------------------------------------------------------------------
// Serializable

/// Hand-written encode and decode against the primitive codec.
///
/// `deserialize` must read exactly what `serialize` wrote.
///
/// # Examples
///
/// ```
/// use crunchy_serialize::{ByteBuffer, ByteWriter, Construct, Serializable, SerializeError};
///
/// #[derive(Debug, PartialEq)]
/// struct Rgb(u8, u8, u8);
///
/// impl Serializable for Rgb {
///     fn serialize(&self, writer: &mut ByteWriter) -> Result<(), SerializeError> {
///         writer.write_bytes(&[self.0, self.1, self.2]);
///         Ok(())
///     }
///
///     fn deserialize(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError> {
///         self.0 = buffer.read_u8()?;
///         self.1 = buffer.read_u8()?;
///         self.2 = buffer.read_u8()?;
///         Ok(())
///     }
/// }
///
/// impl Construct for Rgb {
///     fn allocate() -> Self {
///         Rgb(0, 0, 0)
///     }
/// }
///
/// let mut buffer = crunchy_serialize::serialize(&Rgb(1, 2, 3)).unwrap();
/// assert_eq!(buffer.as_bytes(), [1, 2, 3]);
/// let back: Rgb = crunchy_serialize::deserialize(&mut buffer).unwrap();
/// assert_eq!(back, Rgb(1, 2, 3));
/// ```
pub trait Serializable {
    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), SerializeError>;

    fn deserialize(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError>;
}

/// Encodes `value` through its own codec.
pub fn serialize<T: Serializable + ?Sized>(value: &T) -> Result<ByteBuffer, SerializeError> {
    let mut writer = ByteWriter::new();
    value.serialize(&mut writer)?;
    Ok(writer.into_buffer())
}

/// Allocates a `T` and decodes into it, running its initialization where
/// [`Construct::HINT`] says.
pub fn deserialize<T: Serializable + Construct>(buffer: &mut ByteBuffer) -> Result<T, SerializeError> {
    let mut value = T::allocate();
    match T::HINT {
        ConstructionHint::None => value.deserialize(buffer)?,
        ConstructionHint::BeforeAssignment => {
            value.initialize();
            value.deserialize(buffer)?;
        }
        ConstructionHint::AfterAssignment => {
            value.deserialize(buffer)?;
            value.initialize();
        }
    }
    Ok(value)
}

// -----------------------------------------------------------------------------
// ManualCodec

/// Adapts a value and a pair of closures to [`Serializable`].
///
/// Useful for types from other crates.
///
/// ```
/// use crunchy_serialize::{ByteWriter, ManualCodec, Serializable};
///
/// let mut codec = ManualCodec::new(
///     (7_u8, String::from("seven")),
///     |(n, s), writer: &mut ByteWriter| {
///         writer.write_u8(*n);
///         writer.write_str(s)?;
///         Ok(())
///     },
///     |buffer| Ok((buffer.read_u8()?, buffer.read_string()?)),
/// );
///
/// let mut buffer = crunchy_serialize::serialize(&codec).unwrap();
/// codec.value_mut().0 = 0;
/// codec.deserialize(&mut buffer).unwrap();
/// assert_eq!(codec.into_inner(), (7, String::from("seven")));
/// ```
pub struct ManualCodec<T, E, D> {
    value: T,
    encode: E,
    decode: D,
}

impl<T, E, D> ManualCodec<T, E, D>
where
    E: Fn(&T, &mut ByteWriter) -> Result<(), SerializeError>,
    D: Fn(&mut ByteBuffer) -> Result<T, SerializeError>,
{
    pub fn new(value: T, encode: E, decode: D) -> Self {
        Self {
            value,
            encode,
            decode,
        }
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, E, D> Serializable for ManualCodec<T, E, D>
where
    E: Fn(&T, &mut ByteWriter) -> Result<(), SerializeError>,
    D: Fn(&mut ByteBuffer) -> Result<T, SerializeError>,
{
    fn serialize(&self, writer: &mut ByteWriter) -> Result<(), SerializeError> {
        (self.encode)(&self.value, writer)
    }

    fn deserialize(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError> {
        self.value = (self.decode)(buffer)?;
        Ok(())
    }
}

impl<T: Debug, E, D> Debug for ManualCodec<T, E, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ManualCodec").field(&self.value).finish()
    }
}

// -----------------------------------------------------------------------------
// impl_manual

/// Makes a [`Serializable`] type usable as a walked member and nameable by
/// the registry.
///
/// Implements [`Member`](crate::Member) with the manual classification and
/// [`TypePath`](crate::TypePath). The type path defaults to
/// `module_path!()::Name`.
///
/// ```
/// use crunchy_serialize::{Classification, TypePath, classify, impl_manual};
/// # use crunchy_serialize::{ByteBuffer, ByteWriter, Serializable, SerializeError};
///
/// struct Blob(Vec<u8>);
/// # impl Serializable for Blob {
/// #     fn serialize(&self, _: &mut ByteWriter) -> Result<(), SerializeError> { Ok(()) }
/// #     fn deserialize(&mut self, _: &mut ByteBuffer) -> Result<(), SerializeError> { Ok(()) }
/// # }
///
/// impl_manual!(Blob, "assets::Blob");
///
/// assert_eq!(classify::<Blob>(), Classification::Manual);
/// assert_eq!(Blob::type_path(), "assets::Blob");
/// assert_eq!(Blob::type_name(), "Blob");
/// ```
#[macro_export]
macro_rules! impl_manual {
    ($name:ident) => {
        $crate::impl_manual!($name, concat!(module_path!(), "::", stringify!($name)));
    };
    ($name:ident, $path:expr) => {
        impl $crate::Member for $name {
            #[inline]
            fn classification() -> $crate::Classification {
                $crate::Classification::Manual
            }

            #[inline]
            fn member_ref(&self) -> $crate::MemberRef<'_> {
                $crate::MemberRef::Manual(self)
            }

            #[inline]
            fn member_mut(&mut self) -> $crate::MemberMut<'_> {
                $crate::MemberMut::Manual(self)
            }
        }

        impl $crate::TypePath for $name {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($name)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Records when initialization runs relative to decoding.
    #[derive(Default)]
    struct Traced<const MODE: u8> {
        events: Vec<&'static str>,
        value: u32,
    }

    impl<const MODE: u8> Serializable for Traced<MODE> {
        fn serialize(&self, writer: &mut ByteWriter) -> Result<(), SerializeError> {
            writer.write_u32(self.value);
            Ok(())
        }

        fn deserialize(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError> {
            self.value = buffer.read_u32()?;
            self.events.push("decode");
            Ok(())
        }
    }

    impl<const MODE: u8> Construct for Traced<MODE> {
        const HINT: ConstructionHint = match MODE {
            1 => ConstructionHint::BeforeAssignment,
            2 => ConstructionHint::AfterAssignment,
            _ => ConstructionHint::None,
        };

        fn allocate() -> Self {
            Self::default()
        }

        fn initialize(&mut self) {
            self.events.push("init");
            self.value = 99;
        }
    }

    fn decode<const MODE: u8>() -> Traced<MODE> {
        let source = Traced::<MODE> {
            events: Vec::new(),
            value: 5,
        };
        let mut buffer = serialize(&source).unwrap();
        deserialize(&mut buffer).unwrap()
    }

    #[test]
    fn hint_controls_initialization() {
        let none = decode::<0>();
        assert_eq!(none.events, ["decode"]);
        assert_eq!(none.value, 5);

        let before = decode::<1>();
        assert_eq!(before.events, ["init", "decode"]);
        assert_eq!(before.value, 5);

        let after = decode::<2>();
        assert_eq!(after.events, ["decode", "init"]);
        assert_eq!(after.value, 99);
    }

    #[test]
    fn truncated_input_is_bounds_fault() {
        let mut buffer = ByteBuffer::from_slice(&[1, 2]);
        let err = deserialize::<Traced<0>>(&mut buffer).err().unwrap();
        assert!(err.is_bounds_fault());
    }
}

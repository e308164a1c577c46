use crate::member::Member;
use crate::scalar::{IntegralKind, ScalarKind};

/// Where the walker routes a member of some type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Encoded directly by the primitive codec.
    Scalar(ScalarKind),
    /// An enumeration, encoded as its underlying integer.
    EnumScalar(IntegralKind),
    /// A count followed by elements of one scalar kind.
    Array(ScalarKind),
    /// Owns its encoding through [`Serializable`](crate::Serializable).
    Manual,
    /// Walked member by member.
    Complex,
    /// Nothing above applies. The walker fails on such members.
    Unsupported,
}

impl Classification {
    /// Classification of a value of scalar kind `kind`.
    pub const fn of_scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Enum(repr) => Classification::EnumScalar(repr),
            other => Classification::Scalar(other),
        }
    }

    /// Whether the walker can handle this classification.
    pub const fn is_supported(self) -> bool {
        !matches!(self, Classification::Unsupported)
    }
}

/// Classifies `T`.
///
/// A pure function of the type: `Option<T>` classifies as `T`, since
/// null-ness is a property of the value.
///
/// ```
/// use crunchy_serialize::{classify, Classification, ScalarKind};
///
/// assert_eq!(classify::<u32>(), Classification::Scalar(ScalarKind::U32));
/// assert_eq!(classify::<Option<String>>(), Classification::Scalar(ScalarKind::String));
/// assert_eq!(classify::<Vec<u8>>(), Classification::Array(ScalarKind::U8));
/// assert_eq!(classify::<f32>(), Classification::Unsupported);
/// ```
#[inline]
pub fn classify<T: Member>() -> Classification {
    T::classification()
}

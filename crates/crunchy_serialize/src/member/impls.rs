use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Classification;
use crate::construct::Construct;
use crate::member::{Member, MemberMut, MemberRef};
use crate::scalar::ScalarType;

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_scalar_member {
    ($($ty:ty),* $(,)?) => {$(
        impl Member for $ty {
            #[inline]
            fn classification() -> Classification {
                Classification::of_scalar(<$ty as ScalarType>::KIND)
            }

            #[inline]
            fn member_ref(&self) -> MemberRef<'_> {
                MemberRef::Scalar(self.to_scalar())
            }

            #[inline]
            fn member_mut(&mut self) -> MemberMut<'_> {
                MemberMut::Scalar(self)
            }
        }
    )*};
}

impl_scalar_member!(i8, u8, i16, u16, i32, u32, i64, u64, char, bool, String);

// -----------------------------------------------------------------------------
// Unsupported

macro_rules! impl_unsupported_member {
    ($($ty:ty),* $(,)?) => {$(
        impl Member for $ty {
            #[inline]
            fn classification() -> Classification {
                Classification::Unsupported
            }

            #[inline]
            fn member_ref(&self) -> MemberRef<'_> {
                MemberRef::Unsupported(stringify!($ty))
            }

            #[inline]
            fn member_mut(&mut self) -> MemberMut<'_> {
                MemberMut::Unsupported(stringify!($ty))
            }
        }
    )*};
}

// No scalar kind for floats, and pointer-sized or 128-bit integers.
impl_unsupported_member!(f32, f64, usize, isize, i128, u128);

// -----------------------------------------------------------------------------
// Containers

impl<T: ScalarType> Member for Vec<T> {
    #[inline]
    fn classification() -> Classification {
        Classification::Array(T::KIND)
    }

    #[inline]
    fn member_ref(&self) -> MemberRef<'_> {
        MemberRef::Array(self)
    }

    #[inline]
    fn member_mut(&mut self) -> MemberMut<'_> {
        MemberMut::Array(self)
    }
}

impl<T: ScalarType, const N: usize> Member for [T; N] {
    #[inline]
    fn classification() -> Classification {
        Classification::Array(T::KIND)
    }

    #[inline]
    fn member_ref(&self) -> MemberRef<'_> {
        MemberRef::Array(self)
    }

    #[inline]
    fn member_mut(&mut self) -> MemberMut<'_> {
        MemberMut::Array(self)
    }
}

impl<T: Member + Construct + 'static> Member for Option<T> {
    /// `Option<Option<T>>` is unsupported: both nulls would share one encoding.
    fn classification() -> Classification {
        if T::nullable() {
            Classification::Unsupported
        } else {
            T::classification()
        }
    }

    #[inline]
    fn nullable() -> bool {
        true
    }

    #[inline]
    fn member_ref(&self) -> MemberRef<'_> {
        MemberRef::Nullable(self.as_ref().map(|v| v as &dyn Member))
    }

    #[inline]
    fn member_mut(&mut self) -> MemberMut<'_> {
        MemberMut::Nullable(self)
    }
}

impl<T: Member> Member for Box<T> {
    #[inline]
    fn classification() -> Classification {
        T::classification()
    }

    #[inline]
    fn nullable() -> bool {
        T::nullable()
    }

    #[inline]
    fn member_ref(&self) -> MemberRef<'_> {
        (**self).member_ref()
    }

    #[inline]
    fn member_mut(&mut self) -> MemberMut<'_> {
        (**self).member_mut()
    }
}

//! Members: the values a walked type is made of.
//!
//! A [`Member`] tells the walker how to reach its content for writing
//! ([`MemberRef`]) and for reading ([`MemberMut`]). Implementations exist
//! for every scalar, `Option<T>`, `Box<T>`, `Vec<T>` and `[T; N]` of
//! scalars. `#[derive(Describe)]`, `#[derive(ScalarEnum)]` and
//! [`impl_manual!`](crate::impl_manual) cover user types.

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod slot;

// -----------------------------------------------------------------------------
// Exports

pub use slot::{ArraySlot, ArrayView, NullableSlot, ScalarSlot};

use crate::Classification;
use crate::Serializable;
use crate::object::Object;
use crate::scalar::Scalar;

// -----------------------------------------------------------------------------
// Member

/// A value the walker can visit.
pub trait Member {
    /// Classification of the type. See [`classify`](crate::classify).
    fn classification() -> Classification
    where
        Self: Sized;

    /// Whether values of this type can be null.
    #[inline]
    fn nullable() -> bool
    where
        Self: Sized,
    {
        false
    }

    fn member_ref(&self) -> MemberRef<'_>;

    fn member_mut(&mut self) -> MemberMut<'_>;
}

/// Read access to a member, by classification.
pub enum MemberRef<'a> {
    Scalar(Scalar<'a>),
    Array(&'a dyn ArrayView),
    Manual(&'a dyn Serializable),
    Complex(&'a dyn Object),
    /// `None` is a null member.
    Nullable(Option<&'a dyn Member>),
    /// Carries the type path for the error.
    Unsupported(&'static str),
}

/// Write access to a member, by classification.
pub enum MemberMut<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    Array(&'a mut dyn ArraySlot),
    Manual(&'a mut dyn Serializable),
    Complex(&'a mut dyn Object),
    Nullable(&'a mut dyn NullableSlot),
    Unsupported(&'static str),
}

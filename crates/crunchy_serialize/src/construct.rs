//! Two-phase construction used while decoding.
//!
//! Decoding never calls a constructor with arguments. A value is first
//! [allocated](Construct::allocate) with every member at its raw zero
//! state, then members are assigned, and the type's
//! [initialization](Construct::initialize) runs at the point named by its
//! [`ConstructionHint`], if at all.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// ConstructionHint

/// When a type's initialization runs relative to member assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructionHint {
    /// Initialization is never run by the decoder.
    #[default]
    None,
    /// Runs right after allocation, before any member is assigned.
    /// Decoded members overwrite what it sets.
    BeforeAssignment,
    /// Runs after every member is assigned, so what it sets wins.
    AfterAssignment,
}

// -----------------------------------------------------------------------------
// Construct

/// Allocation and initialization as separate steps.
///
/// `#[derive(Describe)]` implements this field by field. The hint is set with
/// `#[crunchy(hint = BeforeAssignment)]` and the initialization logic with
/// `#[crunchy(init = path::to::fn)]`. `BeforeAssignment` without `init`
/// falls back to `Default::default()`. `AfterAssignment` without `init` is
/// rejected, since a default would discard the decoded members:
///
/// ```compile_fail
/// use crunchy_serialize::Describe;
///
/// #[derive(Describe, Default)]
/// #[crunchy(hint = AfterAssignment)]
/// struct Late {
///     value: u32,
/// }
/// ```
pub trait Construct: Sized {
    const HINT: ConstructionHint = ConstructionHint::None;

    /// The raw value, with no user logic applied.
    fn allocate() -> Self;

    /// The type's no-argument initialization logic.
    #[inline]
    fn initialize(&mut self) {}
}

macro_rules! impl_construct_zero {
    ($($ty:ty => $zero:expr;)*) => {$(
        impl Construct for $ty {
            #[inline(always)]
            fn allocate() -> Self {
                $zero
            }
        }
    )*};
}

impl_construct_zero! {
    i8 => 0;
    u8 => 0;
    i16 => 0;
    u16 => 0;
    i32 => 0;
    u32 => 0;
    i64 => 0;
    u64 => 0;
    i128 => 0;
    u128 => 0;
    isize => 0;
    usize => 0;
    f32 => 0.0;
    f64 => 0.0;
    bool => false;
    char => '\0';
    String => String::new();
}

impl<T> Construct for Vec<T> {
    #[inline(always)]
    fn allocate() -> Self {
        Vec::new()
    }
}

impl<T> Construct for Option<T> {
    #[inline(always)]
    fn allocate() -> Self {
        None
    }
}

impl<T: Construct, const N: usize> Construct for [T; N] {
    #[inline]
    fn allocate() -> Self {
        core::array::from_fn(|_| T::allocate())
    }
}

impl<T: Construct> Construct for Box<T> {
    const HINT: ConstructionHint = T::HINT;

    #[inline]
    fn allocate() -> Self {
        Box::new(T::allocate())
    }

    #[inline]
    fn initialize(&mut self) {
        (**self).initialize();
    }
}

use alloc::boxed::Box;
use core::any::Any;
use core::fmt::{Debug, Formatter};

use crate::construct::{Construct, ConstructionHint};
use crate::descriptor::{MemberInfo, TypeDescriptor};
use crate::member::Member;

// -----------------------------------------------------------------------------
// TypePath

/// Stable names for a type, used by the registry.
pub trait TypePath: 'static {
    /// Full path, e.g. `my_game::save::Player`.
    fn type_path() -> &'static str;

    /// Last path segment, e.g. `Player`.
    fn type_name() -> &'static str;
}

// -----------------------------------------------------------------------------
// Describe

/// A type with a static member table.
///
/// Implement with `#[derive(Describe)]`, or by hand through
/// [`TypeDescriptor::builder`] and a descriptor cell.
pub trait Describe: Construct + TypePath + Member {
    fn descriptor() -> &'static TypeDescriptor<Self>;
}

// -----------------------------------------------------------------------------
// Object

/// Object-safe view of a [`Describe`] type, used by the walker.
///
/// Implemented for every `T: Describe`.
pub trait Object: Any {
    fn object_type_path(&self) -> &'static str;

    fn hint(&self) -> ConstructionHint;

    /// Replaces the value with [`Construct::allocate`].
    fn reset_to_allocated(&mut self);

    /// Runs [`Construct::initialize`].
    fn run_initializer(&mut self);

    /// Number of members, walked or not.
    fn field_count(&self) -> usize;

    /// Member info by index, in name order.
    fn field_info(&self, index: usize) -> Option<&'static MemberInfo>;

    /// `None` if out of range or not readable.
    fn field(&self, index: usize) -> Option<&dyn Member>;

    /// `None` if out of range or not writable.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Member>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Describe> Object for T {
    #[inline]
    fn object_type_path(&self) -> &'static str {
        T::type_path()
    }

    #[inline]
    fn hint(&self) -> ConstructionHint {
        T::HINT
    }

    #[inline]
    fn reset_to_allocated(&mut self) {
        *self = T::allocate();
    }

    #[inline]
    fn run_initializer(&mut self) {
        Construct::initialize(self);
    }

    #[inline]
    fn field_count(&self) -> usize {
        T::descriptor().members().len()
    }

    #[inline]
    fn field_info(&self, index: usize) -> Option<&'static MemberInfo> {
        T::descriptor().members().get(index).map(|m| m.info())
    }

    fn field(&self, index: usize) -> Option<&dyn Member> {
        T::descriptor().members().get(index)?.get(self)
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Member> {
        T::descriptor().members().get(index)?.get_mut(self)
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn Object {
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Takes the concrete value, or gives the box back on a type mismatch.
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Box<dyn Object>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(value) => Ok(value),
                Err(_) => unreachable!("type checked above"),
            }
        } else {
            Err(self)
        }
    }
}

impl Debug for dyn Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("dyn Object")
            .field("type_path", &self.object_type_path())
            .field("fields", &self.field_count())
            .finish()
    }
}

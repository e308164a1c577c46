//! Process-wide storage for descriptors.
//!
//! ## DescriptorCell
//!
//! For non-generic types. A `static` inside [`Describe::descriptor`] holds
//! exactly one descriptor.
//!
//! ## GenericDescriptorCell
//!
//! A `static` inside a generic function is shared by every instantiation,
//! so the generic cell keeps one descriptor per [`TypeId`].
//!
//! [`Describe::descriptor`]: crate::Describe::descriptor

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crunchy_utils::TypeIdMap;

use crate::descriptor::TypeDescriptor;

// -----------------------------------------------------------------------------
// DescriptorCell

/// Holds the descriptor of one non-generic type.
///
/// ```
/// use crunchy_serialize::{DescriptorCell, TypeDescriptor};
///
/// struct Flag {
///     on: bool,
/// }
///
/// fn descriptor() -> &'static TypeDescriptor<Flag> {
///     static CELL: DescriptorCell<Flag> = DescriptorCell::new();
///     CELL.get_or_init(|| {
///         TypeDescriptor::builder("demo::Flag", "Flag")
///             .member::<bool>("on", |f: &Flag| &f.on, |f: &mut Flag| &mut f.on)
///             .build()
///     })
/// }
///
/// assert!(core::ptr::eq(descriptor(), descriptor()));
/// ```
pub struct DescriptorCell<T>(OnceLock<TypeDescriptor<T>>);

impl<T> DescriptorCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeDescriptor<T>) -> &TypeDescriptor<T> {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericDescriptorCell

/// Holds one descriptor per instantiation of a generic type.
///
/// Descriptors are leaked on first use and live for the whole process.
pub struct GenericDescriptorCell(RwLock<TypeIdMap<&'static (dyn Any + Send + Sync)>>);

impl GenericDescriptorCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    pub fn get_or_insert<T: 'static>(
        &self,
        f: impl FnOnce() -> TypeDescriptor<T>,
    ) -> &'static TypeDescriptor<T> {
        let type_id = TypeId::of::<T>();

        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();

        let erased = match found {
            Some(erased) => erased,
            None => *self
                .0
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .get_or_insert(type_id, || -> &'static (dyn Any + Send + Sync) {
                    Box::leak(Box::new(f()))
                }),
        };

        match erased.downcast_ref::<TypeDescriptor<T>>() {
            Some(descriptor) => descriptor,
            None => unreachable!("descriptor stored under the wrong TypeId"),
        }
    }
}

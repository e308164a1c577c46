//! Static member tables.
//!
//! A [`TypeDescriptor`] lists a type's members in name order, each with its
//! accessors and ignore flag. The walker visits exactly this order on both
//! sides, so the encoding of a type depends on its member names and not on
//! the order they are declared in. Renaming a member can reorder the wire
//! layout; there is no versioning.
//!
//! Descriptors are built once per type and kept for the life of the
//! process in a [`DescriptorCell`] or [`GenericDescriptorCell`].

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod member_descriptor;
mod type_descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{DescriptorCell, GenericDescriptorCell};
pub use member_descriptor::{MemberDescriptor, MemberInfo};
pub use type_descriptor::{TypeDescriptor, TypeDescriptorBuilder};

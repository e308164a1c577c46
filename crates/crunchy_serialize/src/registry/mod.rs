//! Runtime lookup of codec capabilities by [`TypeId`](core::any::TypeId),
//! full type path or short type name.
//!
//! A [`TypeRegistration`] records what a type supports:
//!
//! - the automatic codec, for types that implement [`Describe`](crate::Describe);
//! - the manual codec, for types that implement [`Serializable`](crate::Serializable).
//!
//! Registering the same type both ways merges the two capabilities.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types deriving `Describe` with
//! `#[crunchy(auto_register)]` are collected at link time and added by
//! [`TypeRegistry::auto_register`]. Generic types are never collected.

// -----------------------------------------------------------------------------
// Modules

mod registration;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use registration::TypeRegistration;
pub use type_registry::TypeRegistry;

//! Shared containers used across the crunchy crates.
//!
//! Nothing here knows about the wire format. The serializer keeps its type
//! tables in [`TypeIdMap`] and name indexes in [`hash::HashMap`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;

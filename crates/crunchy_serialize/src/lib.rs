//! A compact binary codec for object graphs.
//!
//! Two codecs share one primitive layer ([`ByteWriter`] / [`ByteBuffer`]):
//!
//! - the **automatic** codec walks a type's members in name order, driven
//!   by a descriptor generated with `#[derive(Describe)]`;
//! - the **manual** codec calls the type's own [`Serializable`] impl.
//!
//! Both produce untagged output. The reader must decode with the same
//! type, and with the automatic codec the same [`WalkOptions`], as the
//! writer.
//!
//! ```
//! use crunchy_serialize::{Describe, ScalarEnum, WalkOptions};
//!
//! #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
//! #[repr(u8)]
//! enum Suit {
//!     Hearts = 1,
//!     Spades = 4,
//! }
//!
//! #[derive(Describe, Debug, PartialEq)]
//! struct Card {
//!     suit: Suit,
//!     rank: u8,
//!     owner: Option<String>,
//! }
//!
//! let card = Card { suit: Suit::Spades, rank: 12, owner: None };
//!
//! let mut buffer = crunchy_serialize::serialize_automatic(&card, WalkOptions::new()).unwrap();
//! let back: Card = crunchy_serialize::deserialize_automatic(&mut buffer, WalkOptions::new()).unwrap();
//!
//! assert_eq!(back, card);
//! assert!(buffer.is_exhausted());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names `crunchy_serialize`, which must also resolve inside
// this crate's own tests.
extern crate self as crunchy_serialize;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod classify;
mod construct;
mod error;
mod manual;
mod object;
mod scalar;

pub mod descriptor;
pub mod member;
pub mod registry;
pub mod walk;

#[cfg(feature = "compress")]
pub mod compress;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use crunchy_buffer::{BoundsFault, ByteBuffer, ByteWriter, DecodeError, EncodeError};

#[cfg(feature = "std")]
pub use crunchy_buffer::BufferPool;

pub use classify::{Classification, classify};
pub use construct::{Construct, ConstructionHint};
pub use descriptor::{
    DescriptorCell, GenericDescriptorCell, MemberDescriptor, MemberInfo, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use error::SerializeError;
pub use manual::{ManualCodec, Serializable, deserialize, serialize};
pub use member::{Member, MemberMut, MemberRef};
pub use object::{Describe, Object, TypePath};
pub use registry::{TypeRegistration, TypeRegistry};
pub use scalar::{
    IntegralKind, IntegralValue, Scalar, ScalarEnum, ScalarKind, ScalarType, ScalarValue,
    enum_from_scalar, read_scalar, write_scalar,
};
pub use walk::{
    Depth, DepthPolicy, NULL_SENTINEL, NullEncoding, WalkOptions, deserialize_automatic, deserialize_object,
    serialize_automatic, serialize_object,
};

pub use crunchy_serialize_derive::{Describe, ScalarEnum};

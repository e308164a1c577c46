//! Primitive wire codec: an append-only [`ByteWriter`] and a cursor based
//! [`ByteBuffer`] with lookahead.
//!
//! # Wire format
//!
//! All fixed-width values are little-endian.
//!
//! | Kind | Encoding |
//! |---|---|
//! | `i8`..`u64` | raw bytes |
//! | `char` | one UTF-16 code unit (2 bytes) |
//! | `bool` | 1 byte, `0` or `1` |
//! | string | `i32` count of UTF-16 units, then the units |
//! | array | `i32` element count, then each element |
//!
//! The format carries no tags. A reader must ask for exactly the kinds the
//! writer wrote, in the same order.
//!
//! # Example
//!
//! ```
//! use crunchy_buffer::{ByteBuffer, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_i32(42);
//! writer.write_str("hi").unwrap();
//! writer.write_array(&[1_u8, 2, 3]).unwrap();
//!
//! let mut buffer: ByteBuffer = writer.into_buffer();
//! assert_eq!(buffer.peek_i32().unwrap(), 42);
//! assert_eq!(buffer.read_i32().unwrap(), 42);
//! assert_eq!(buffer.read_string().unwrap(), "hi");
//! assert_eq!(buffer.read_array::<u8>().unwrap(), [1, 2, 3]);
//! assert!(buffer.is_exhausted());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reader;
mod storage;
mod wire;
mod writer;

#[cfg(feature = "std")]
mod pool;

// -----------------------------------------------------------------------------
// Exports

pub use error::{BoundsFault, DecodeError, EncodeError};
pub use reader::ByteBuffer;
pub use wire::Wire;
pub use writer::ByteWriter;

#[cfg(feature = "std")]
pub use pool::{BufferPool, PooledBytes};

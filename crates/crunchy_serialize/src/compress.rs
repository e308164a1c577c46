//! Raw DEFLATE over encoded buffers.
//!
//! The codec output carries no framing, so the compressed form does not
//! either. Callers store or transmit the compressed length themselves.
//!
//! ```
//! use crunchy_serialize::compress::{CompressionLevel, compress, decompress};
//!
//! let input = b"crunchy crunchy crunchy crunchy".to_vec();
//! let packed = compress(&input, CompressionLevel::Optimal).unwrap();
//! assert_eq!(decompress(&packed).unwrap(), input);
//! ```

use alloc::vec::Vec;
use std::io::{Read, Write};

use crunchy_buffer::ByteBuffer;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::SerializeError;

// -----------------------------------------------------------------------------
// CompressionLevel

/// Speed versus size trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompressionLevel {
    Fastest,
    #[default]
    Optimal,
    /// Stored blocks only.
    NoCompression,
    SmallestSize,
}

impl From<CompressionLevel> for Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Fastest => Compression::fast(),
            CompressionLevel::Optimal => Compression::default(),
            CompressionLevel::NoCompression => Compression::none(),
            CompressionLevel::SmallestSize => Compression::best(),
        }
    }
}

// -----------------------------------------------------------------------------
// Functions

/// Compresses `bytes` as one raw DEFLATE stream.
pub fn compress(bytes: &[u8], level: CompressionLevel) -> Result<Vec<u8>, SerializeError> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(bytes.len() / 2), level.into());
    encoder.write_all(bytes)?;
    let output = encoder.finish()?;

    log::debug!(
        "compressed {} bytes to {} bytes ({level:?})",
        bytes.len(),
        output.len(),
    );
    Ok(output)
}

/// Inflates a raw DEFLATE stream written by [`compress`].
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, SerializeError> {
    let mut output = Vec::with_capacity(bytes.len().saturating_mul(2));
    DeflateDecoder::new(bytes).read_to_end(&mut output)?;

    log::debug!("decompressed {} bytes to {} bytes", bytes.len(), output.len());
    Ok(output)
}

/// Inflates `bytes` into a decoder positioned at the start.
#[inline]
pub fn decompress_to_buffer(bytes: &[u8]) -> Result<ByteBuffer, SerializeError> {
    decompress(bytes).map(ByteBuffer::new)
}

use thiserror::Error;

// -----------------------------------------------------------------------------
// BoundsFault

/// A read or peek that would pass the end of the buffer.
///
/// This is not recoverable. It means the reader type does not match the
/// writer type, or the bytes are truncated. The cursor is left where it was
/// before the failing read.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("reading {requested} bytes at position {position} overruns buffer of length {len}")]
pub struct BoundsFault {
    pub position: usize,
    pub requested: usize,
    pub len: usize,
}

// -----------------------------------------------------------------------------
// DecodeError

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    Bounds(#[from] BoundsFault),

    #[error("negative length prefix {0}")]
    NegativeLength(i32),

    #[error("code unit {0:#06x} is not a standalone char")]
    InvalidChar(u16),

    #[error("string content is not valid UTF-16")]
    InvalidUtf16,

    #[error("array length mismatch: expected {expect}, found {actual}")]
    LengthMismatch { expect: usize, actual: usize },
}

// -----------------------------------------------------------------------------
// EncodeError

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("length {0} does not fit a 4-byte prefix")]
    LengthOverflow(usize),

    #[error("char {0:?} does not fit a single UTF-16 code unit")]
    UnrepresentableChar(char),
}

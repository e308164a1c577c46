use alloc::boxed::Box;
use alloc::string::String;

use crunchy_buffer::{BoundsFault, DecodeError, EncodeError};
use thiserror::Error;

use crate::scalar::{IntegralValue, ScalarKind};

// -----------------------------------------------------------------------------
// SerializeError

/// Errors produced while encoding or decoding values.
///
/// None of these are retried. After a decode error the buffer position is
/// unspecified and the buffer should be discarded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Includes [`BoundsFault`], see [`is_bounds_fault`](Self::is_bounds_fault).
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The walker reached a member it cannot encode, decode or recurse into.
    #[error("`{type_path}` cannot be encoded automatically")]
    UnsupportedType { type_path: &'static str },

    /// A manual codec was requested for a type without one.
    #[error("`{type_path}` does not implement the manual codec contract")]
    ContractViolation { type_path: String },

    #[error("no registered type matches `{name}`")]
    UnknownType { name: String },

    #[error("type name `{name}` matches more than one registered type")]
    AmbiguousType { name: String },

    #[error("{value} is not a discriminant of `{type_path}`")]
    UnknownDiscriminant {
        type_path: &'static str,
        value: IntegralValue,
    },

    #[error("scalar kind mismatch: expected {expect:?}, found {found:?}")]
    KindMismatch { expect: ScalarKind, found: ScalarKind },

    /// A non-null nullable member encodes to bytes starting with the null
    /// sentinel.
    #[error("non-null value encodes like the null sentinel and would decode as null")]
    SentinelCollision,

    #[error("depth budget exhausted before `{type_path}`")]
    DepthExhausted { type_path: &'static str },

    #[error("object graph nests deeper than the recursion limit {limit}")]
    RecursionLimit { limit: u32 },

    #[error("compression failed: {0}")]
    Compression(#[from] std::io::Error),

    /// Wraps an error with the member path the walker was on.
    #[error("{source} (member `{path}`)")]
    InMember {
        path: String,
        source: Box<SerializeError>,
    },
}

impl SerializeError {
    /// Strips [`InMember`](Self::InMember) context.
    pub fn root_cause(&self) -> &SerializeError {
        match self {
            SerializeError::InMember { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this is a read past the end of a buffer.
    pub fn is_bounds_fault(&self) -> bool {
        matches!(
            self.root_cause(),
            SerializeError::Decode(DecodeError::Bounds(_))
        )
    }

    /// The member path attached in debug builds, if any.
    pub fn member_path(&self) -> Option<&str> {
        match self {
            SerializeError::InMember { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<BoundsFault> for SerializeError {
    #[inline]
    fn from(value: BoundsFault) -> Self {
        SerializeError::Decode(DecodeError::Bounds(value))
    }
}

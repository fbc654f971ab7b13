//! Error types for type classification.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TypeofError
//! ├── Unrecognized          - value shape cannot be fingerprinted (recoverable)
//! ├── OutOfMemory           - buffer or table growth failed (fatal for the request)
//! ├── InvalidTypecode       - resolver produced a code outside the valid range
//! ├── Resolve               - resolver-reported failure
//! └── initialization errors - MissingBasicType, UnsupportedPointerWidth, ...
//! ```
//!
//! `Unrecognized` never escapes the dispatch entry point: the fingerprint
//! cache catches it and falls back to an uncached resolver call. Every other
//! variant is propagated to the caller unchanged.

use thiserror::Error;

/// Result alias used throughout the classification core.
pub type TypeofResult<T> = Result<T, TypeofError>;

/// Errors produced while classifying a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeofError {
    /// No fingerprint can be computed for the value.
    #[error("cannot compute type fingerprint for {kind} value")]
    Unrecognized { kind: &'static str },

    /// Growing a fingerprint buffer or a cache table failed.
    #[error("out of memory while {context}")]
    OutOfMemory { context: &'static str },

    /// A raw typecode was negative or outside the representable range.
    #[error("invalid typecode {raw}")]
    InvalidTypecode { raw: i64 },

    /// The resolver failed to type the value.
    #[error("type resolution failed: {message}")]
    Resolve { message: String },

    /// The initialization map lacks one of the elementary kinds.
    #[error("missing typecode for elementary type '{name}'")]
    MissingBasicType { name: &'static str },

    /// The platform pointer width has no matching integer kind.
    #[error("unsupported pointer width: {bits} bits")]
    UnsupportedPointerWidth { bits: u32 },

    /// The process-wide dispatcher was initialized twice.
    #[error("typecode dispatcher already initialized")]
    AlreadyInitialized,

    /// The process-wide dispatcher was used before initialization.
    #[error("typecode dispatcher not initialized")]
    NotInitialized,
}

impl TypeofError {
    /// Create a resolver failure from any displayable message.
    pub fn resolve(message: impl Into<String>) -> Self {
        TypeofError::Resolve {
            message: message.into(),
        }
    }

    /// Whether this is the recoverable "cannot fingerprint" condition.
    #[inline]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, TypeofError::Unrecognized { .. })
    }
}

/// Errors reported by a [`BufferExporter`](crate::BufferExporter) when a view
/// cannot be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A writable view was requested from read-only memory.
    #[error("buffer is not writable")]
    NotWritable,

    /// The object does not export a buffer at all.
    #[error("object does not support the buffer protocol")]
    Unsupported,

    /// Any other exporter-specific failure.
    #[error("buffer export failed: {0}")]
    Other(String),
}

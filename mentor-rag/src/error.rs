//! Error types for the `mentor-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding provider failed or returned a malformed vector.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An I/O failure while writing or reading an index file.
    #[error("Index I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No index file exists at the given path.
    #[error("No index found at {0}")]
    IndexNotFound(PathBuf),

    /// The index file exists but could not be decoded into a consistent
    /// index.
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// A search was issued against an index with no entries. Callers
    /// treat this as "no context available", not a fatal condition.
    #[error("The index is empty")]
    EmptyIndex,

    /// A vector length did not match the index dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The index dimension.
        expected: usize,
        /// The offending vector's length.
        actual: usize,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;

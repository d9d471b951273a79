//! Error types for nifheim-common.

use thiserror::Error;

/// Common error type for Nifheim stream operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream ended before a read could be satisfied.
    #[error("truncated stream: needed {needed} bytes at offset {position}")]
    TruncatedStream { position: u64, needed: usize },

    /// A bulk read whose byte size does not fit in memory.
    #[error("array of {count} elements of {element_size} bytes is too large")]
    ArrayTooLarge { count: usize, element_size: usize },

    /// I/O error other than end of stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check whether this error is a short read.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedStream { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for index construction.
//!
//! Searching never fails: a pattern that does not occur simply yields an
//! empty result. Only building an index can be rejected, and when it is the
//! caller gets no partially built structure back.

use thiserror::Error;

/// Result type for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Reasons an [`FmIndex`](crate::index::FmIndex) cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("sentinel byte 0x{sentinel:02x} appears inside the text at offset {offset}")]
    SentinelInText { sentinel: u8, offset: usize },

    #[error("byte 0x{byte:02x} at offset {offset} is outside the declared alphabet of {size} symbols")]
    SymbolOutOfAlphabet { byte: u8, offset: usize, size: usize },

    #[error("alphabet size must be between 1 and 256, got {0}")]
    InvalidAlphabet(usize),

    #[error("checkpoint interval must be at least 1")]
    InvalidCheckpointInterval,
}

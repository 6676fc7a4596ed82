//! # Domain Errors

use shared_types::BlockHeight;
use thiserror::Error;

/// Encoding failure reported by an [`crate::ports::EntryCodec`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("codec error: {message}")]
pub struct CodecError {
    /// Codec diagnostic
    pub message: String,
}

/// Block cache error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The block could not be encoded or a stored entry could not be decoded.
    #[error("entry encoding failed at height {height}: {source}")]
    Encoding {
        /// Height being written or read
        height: BlockHeight,
        /// Underlying codec failure
        #[source]
        source: CodecError,
    },

    /// `add` skipped past the end of the window.
    #[error("height gap: expected at most {expected}, got {got}")]
    HeightGap {
        /// Highest height that may be added next
        expected: BlockHeight,
        /// Height that was offered
        got: BlockHeight,
    },
}

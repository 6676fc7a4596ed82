//! # Domain Errors

use lw_01_block_cache::CacheError;
use shared_types::{BlockHeight, SourceError};
use thiserror::Error;

/// Retrieval error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    /// Nothing has been cached yet.
    #[error("server not ready: no blocks cached yet")]
    NotReady,

    /// The height is above the tip the ingestor has verified.
    #[error("unavailable: requested block {height} newer than tip {tip}")]
    NewerThanTip {
        /// Requested height
        height: BlockHeight,
        /// Cached tip
        tip: BlockHeight,
    },

    /// The node has no block at a height the cache says exists.
    #[error("block {height} not found on node")]
    NotFound {
        /// Requested height
        height: BlockHeight,
    },

    /// The cached entry could not be decoded.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Fetching a historical block from the node failed.
    #[error("fetching block {height} failed: {source}")]
    Source {
        /// Requested height
        height: BlockHeight,
        /// Node-side failure
        #[source]
        source: SourceError,
    },

    /// The range deadline passed before the stream finished.
    #[error("deadline exceeded at block {height}")]
    DeadlineExceeded {
        /// Height being produced when time ran out
        height: BlockHeight,
    },

    /// Invalid configuration.
    #[error("invalid retrieval configuration: {0}")]
    Config(String),
}

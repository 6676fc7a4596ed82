//! # Domain Errors

use shared_types::BlockHeight;
use thiserror::Error;

/// Chain-tip ingestor error types.
///
/// Fetch and cache failures are absorbed by the poll loop; only these stop it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngestorError {
    /// The node kept diverging from the cache for more rounds than allowed.
    #[error("reorg deeper than cache can repair: {rounds} rewind rounds, last at height {height}")]
    ReorgTooDeep {
        /// Consecutive reorg rounds seen
        rounds: u32,
        /// Height being fetched when the ceiling was crossed
        height: BlockHeight,
    },

    /// Invalid configuration.
    #[error("invalid ingestor configuration: {0}")]
    Config(String),
}

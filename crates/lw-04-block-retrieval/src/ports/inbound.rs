//! # Inbound Ports

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{BlockHeight, CompactBlock};

use crate::domain::{BlockRangeStream, RetrievalError};

/// Block retrieval API - inbound port.
#[async_trait]
pub trait BlockRetrievalApi: Send + Sync {
    /// Block at `height`: cache first, then the node for evicted heights at
    /// or below the tip.
    async fn get_block(&self, height: BlockHeight) -> Result<CompactBlock, RetrievalError>;

    /// Highest cached height.
    fn get_latest_block(&self) -> Result<BlockHeight, RetrievalError>;

    /// Stream `start..=end`; descending when `start > end`. `deadline`
    /// defaults to the configured range deadline.
    fn get_block_range(
        &self,
        start: BlockHeight,
        end: BlockHeight,
        deadline: Option<Duration>,
    ) -> BlockRangeStream;
}

//! # Block Source
//!
//! The boundary through which the ingestor and the retrieval API obtain blocks
//! from the full node.

use async_trait::async_trait;

use crate::entities::{BlockHeight, CompactBlock};
use crate::errors::SourceError;

/// Fetches compact blocks by height from an upstream node.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Fetch the block at `height`.
    ///
    /// Returns `Ok(None)` when the node has not produced that height yet.
    async fn fetch_block(&self, height: BlockHeight) -> Result<Option<CompactBlock>, SourceError>;
}

#[async_trait]
impl<T: BlockSource + ?Sized> BlockSource for std::sync::Arc<T> {
    async fn fetch_block(&self, height: BlockHeight) -> Result<Option<CompactBlock>, SourceError> {
        (**self).fetch_block(height).await
    }
}

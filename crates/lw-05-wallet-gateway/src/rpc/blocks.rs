//! Block methods: `GetLatestBlock`, `GetBlock`, `GetBlockRange`.

use futures::StreamExt;
use tracing::{debug, instrument};

use super::{stop_after_error, to_json, ResponseStream, WalletRpc};
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::types::{BlockId, BlockRange, WalletBlock};

impl WalletRpc {
    /// GetLatestBlock - height of the cached tip
    #[instrument(skip(self))]
    pub fn get_latest_block(&self) -> ApiResult<BlockId> {
        Ok(BlockId::at(self.retrieval.get_latest_block()?))
    }

    /// GetBlock - compact block by height
    ///
    /// A non-zero height wins over a hash. Hash lookups are not served.
    #[instrument(skip(self))]
    pub async fn get_block(&self, id: BlockId) -> ApiResult<WalletBlock> {
        if id.height == 0 {
            return match id.hash {
                Some(_) => Err(ApiError::unimplemented(
                    "GetBlock by hash is not yet implemented",
                )),
                None => Err(ApiError::invalid_params("request for unspecified identifier")),
            };
        }
        let block = self.retrieval.get_block(id.height).await?;
        Ok(WalletBlock::from(&block))
    }

    /// GetBlockRange - compact blocks from `start` to `end`, inclusive
    #[instrument(skip(self))]
    pub fn get_block_range(&self, range: BlockRange) -> ResponseStream {
        let (start, end) = (range.start.height, range.end.height);
        debug!(start, end, "streaming block range");
        let blocks = self
            .retrieval
            .get_block_range(start, end, None)
            .map(|item| match item {
                Ok(block) => to_json(&WalletBlock::from(&block)),
                Err(e) => Err(ApiError::from(e)),
            });
        stop_after_error(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{chain, handlers};
    use crate::domain::error::codes;
    use crate::domain::types::{BlockId, BlockRange};
    use futures::StreamExt;
    use lw_02_node_rpc::MockTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_latest_block_not_ready() {
        let rpc = handlers(Arc::new(MockTransport::new()), vec![], &[]);
        let err = rpc.get_latest_block().unwrap_err();
        assert_eq!(err.code, codes::RESOURCE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_latest_block_is_cached_tip() {
        let blocks = chain(100, 3);
        let rpc = handlers(Arc::new(MockTransport::new()), blocks.clone(), &blocks);
        assert_eq!(rpc.get_latest_block().unwrap(), BlockId::at(102));
    }

    #[tokio::test]
    async fn test_get_block_unspecified_identifier() {
        let rpc = handlers(Arc::new(MockTransport::new()), vec![], &[]);
        let err = rpc.get_block(BlockId::default()).await.unwrap_err();
        assert_eq!(err.code, codes::INVALID_PARAMS);
        assert!(err.message.contains("request for unspecified identifier"));
    }

    #[tokio::test]
    async fn test_get_block_by_hash_unimplemented() {
        let rpc = handlers(Arc::new(MockTransport::new()), vec![], &[]);
        let id = BlockId {
            height: 0,
            hash: Some("00".repeat(32)),
        };
        let err = rpc.get_block(id).await.unwrap_err();
        assert_eq!(err.code, codes::UNIMPLEMENTED);
    }

    #[tokio::test]
    async fn test_get_block_from_cache() {
        let blocks = chain(100, 3);
        let rpc = handlers(Arc::new(MockTransport::new()), blocks.clone(), &blocks);
        let block = rpc.get_block(BlockId::at(101)).await.unwrap();
        assert_eq!(block.hash, blocks[1].hash_hex());
    }

    #[tokio::test]
    async fn test_get_block_newer_than_tip() {
        let blocks = chain(100, 3);
        let rpc = handlers(Arc::new(MockTransport::new()), chain(100, 5), &blocks);
        let err = rpc.get_block(BlockId::at(103)).await.unwrap_err();
        assert_eq!(err.code, codes::RESOURCE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_block_range_stops_at_first_error() {
        let blocks = chain(100, 3);
        let rpc = handlers(Arc::new(MockTransport::new()), blocks.clone(), &blocks);
        let range = BlockRange {
            start: BlockId::at(101),
            end: BlockId::at(104),
        };
        let items: Vec<_> = rpc.get_block_range(range).collect().await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap()["height"], 101);
        assert_eq!(items[1].as_ref().unwrap()["height"], 102);
        assert_eq!(items[2].as_ref().unwrap_err().code, codes::RESOURCE_UNAVAILABLE);
    }
}

//! # Block Retrieval Service

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lw_telemetry::{BLOCKS_SERVED, RANGE_STREAMS};
use shared_types::{BlockHeight, CompactBlock};
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use crate::config::RetrievalConfig;
use crate::domain::{BlockRangeStream, RangeItem, RetrievalError};
use crate::ports::{BlockCacheApi, BlockRetrievalApi, BlockSource};

/// Cache-first block reader.
pub struct BlockRetrievalService<S, C> {
    source: Arc<S>,
    cache: Arc<C>,
    config: RetrievalConfig,
}

impl<S, C> Clone for BlockRetrievalService<S, C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

impl<S, C> BlockRetrievalService<S, C>
where
    S: BlockSource + 'static,
    C: BlockCacheApi + 'static,
{
    /// Create a new retrieval service.
    pub fn new(
        source: Arc<S>,
        cache: Arc<C>,
        config: RetrievalConfig,
    ) -> Result<Self, RetrievalError> {
        config.validate()?;
        Ok(Self {
            source,
            cache,
            config,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }
}

/// Where a range producer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeOutcome {
    Complete,
    Failed,
    Cancelled,
}

impl RangeOutcome {
    fn label(self) -> &'static str {
        match self {
            RangeOutcome::Complete => "complete",
            RangeOutcome::Failed => "error",
            RangeOutcome::Cancelled => "cancelled",
        }
    }
}

fn range_heights(start: BlockHeight, end: BlockHeight) -> Box<dyn Iterator<Item = BlockHeight> + Send> {
    if start <= end {
        Box::new(start..=end)
    } else {
        Box::new((end..=start).rev())
    }
}

async fn read_block<S, C>(
    source: &S,
    cache: &C,
    height: BlockHeight,
) -> Result<CompactBlock, RetrievalError>
where
    S: BlockSource + ?Sized,
    C: BlockCacheApi + ?Sized,
{
    if let Some(block) = cache.get(height)? {
        BLOCKS_SERVED.with_label_values(&["cache"]).inc();
        return Ok(block);
    }

    let tip = cache.latest_height().ok_or(RetrievalError::NotReady)?;
    if height > tip {
        return Err(RetrievalError::NewerThanTip { height, tip });
    }

    debug!(height, tip, "Block evicted from cache, asking node");
    match source.fetch_block(height).await {
        Ok(Some(block)) => {
            BLOCKS_SERVED.with_label_values(&["node"]).inc();
            Ok(block)
        }
        Ok(None) => Err(RetrievalError::NotFound { height }),
        Err(source) => Err(RetrievalError::Source { height, source }),
    }
}

async fn produce_range<S, C>(
    source: Arc<S>,
    cache: Arc<C>,
    start: BlockHeight,
    end: BlockHeight,
    deadline: Instant,
    tx: mpsc::Sender<RangeItem>,
) -> RangeOutcome
where
    S: BlockSource,
    C: BlockCacheApi,
{
    for height in range_heights(start, end) {
        let item = tokio::select! {
            biased;
            _ = tx.closed() => return RangeOutcome::Cancelled,
            read = timeout_at(deadline, read_block(&*source, &*cache, height)) => {
                read.unwrap_or(Err(RetrievalError::DeadlineExceeded { height }))
            }
        };

        let failed = item.is_err();
        if let Err(e) = &item {
            warn!(start, end, height, error = %e, "Block range stopped");
        }

        match timeout_at(deadline, tx.send(item)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return RangeOutcome::Cancelled,
            Err(_) => {
                // Consumer is too slow to take the next block in time.
                let _ = tx.try_send(Err(RetrievalError::DeadlineExceeded { height }));
                return RangeOutcome::Failed;
            }
        }

        if failed {
            return RangeOutcome::Failed;
        }
    }
    RangeOutcome::Complete
}

#[async_trait]
impl<S, C> BlockRetrievalApi for BlockRetrievalService<S, C>
where
    S: BlockSource + 'static,
    C: BlockCacheApi + 'static,
{
    async fn get_block(&self, height: BlockHeight) -> Result<CompactBlock, RetrievalError> {
        read_block(&*self.source, &*self.cache, height).await
    }

    fn get_latest_block(&self) -> Result<BlockHeight, RetrievalError> {
        self.cache.latest_height().ok_or(RetrievalError::NotReady)
    }

    fn get_block_range(
        &self,
        start: BlockHeight,
        end: BlockHeight,
        deadline: Option<Duration>,
    ) -> BlockRangeStream {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let deadline = Instant::now() + deadline.unwrap_or(self.config.range_deadline);
        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);

        tokio::spawn(async move {
            let outcome = produce_range(source, cache, start, end, deadline, tx).await;
            RANGE_STREAMS.with_label_values(&[outcome.label()]).inc();
            debug!(start, end, outcome = outcome.label(), "Block range finished");
        });

        BlockRangeStream::new(rx)
    }
}

//! # Chain Ingestor Service
//!
//! Drives the cache toward the node's tip. No cache lock is held across a
//! fetch: the cache API is synchronous and the fetch completes before `add`.

use lw_01_block_cache::{AddOutcome, CacheError};
use lw_telemetry::{record_error, BLOCKS_INGESTED, CACHED_TIP, FETCH_FAILURES, REORGS_DETECTED};
use shared_types::BlockHeight;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::IngestorConfig;
use crate::domain::{IngestorError, IngestorState, RoundOutcome};
use crate::ports::{BlockCacheApi, BlockSource};

/// Chain-tip ingestor. The only writer of the cache.
pub struct ChainIngestor<S: BlockSource, C: BlockCacheApi> {
    source: S,
    cache: C,
    config: IngestorConfig,
    state: IngestorState,
}

impl<S: BlockSource, C: BlockCacheApi> ChainIngestor<S, C> {
    /// Create an ingestor that will fetch `start_height` first.
    pub fn new(
        source: S,
        cache: C,
        config: IngestorConfig,
        start_height: BlockHeight,
    ) -> Result<Self, IngestorError> {
        config.validate()?;
        Ok(Self {
            source,
            cache,
            config,
            state: IngestorState::starting_at(start_height),
        })
    }

    /// Current loop state.
    pub fn state(&self) -> IngestorState {
        self.state
    }

    /// The cache being fed.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Poll until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// The first round starts immediately. Returns an error only when the
    /// reorg ceiling is crossed.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), IngestorError> {
        info!(
            start_height = self.state.height,
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Chain ingestor started"
        );

        loop {
            match self.poll_round(&shutdown).await? {
                RoundOutcome::Stopped => break,
                outcome => debug!(?outcome, next_height = self.state.height, "Poll round finished"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(next_height = self.state.height, "Chain ingestor stopped");
        Ok(())
    }

    /// One poll round: fetch and add until the node has nothing new, the
    /// failure budget runs out, or shutdown is requested.
    pub async fn poll_round(
        &mut self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<RoundOutcome, IngestorError> {
        let mut stored = 0u64;

        let outcome = loop {
            if *shutdown.borrow() {
                break RoundOutcome::Stopped;
            }

            if let Some(height) = self.state.apply_rewind(self.config.rewind_step) {
                warn!(
                    height,
                    reorg_count = self.state.reorg_count,
                    "Rewinding after reorg"
                );
            }

            // Checked after the rewind: the reported height is where the
            // next fetch would have gone.
            if self.state.reorg_count > self.config.max_reorg_rounds {
                error!(
                    rounds = self.state.reorg_count,
                    height = self.state.height,
                    "Reorg ceiling exceeded, operator intervention required"
                );
                return Err(IngestorError::ReorgTooDeep {
                    rounds: self.state.reorg_count,
                    height: self.state.height,
                });
            }

            let height = self.state.height;
            let block = match self.source.fetch_block(height).await {
                Ok(Some(block)) => block,
                Ok(None) => break RoundOutcome::CaughtUp,
                Err(e) => {
                    FETCH_FAILURES.inc();
                    record_error!("ingestor", "fetch");
                    warn!(height, error = %e, failures = self.state.failure_count + 1, "Block fetch failed");
                    if self.fail_and_check_budget() {
                        break RoundOutcome::Abandoned;
                    }
                    continue;
                }
            };

            match self.cache.add(height, &block) {
                Ok(AddOutcome::Stored { evicted }) => {
                    self.state.record_stored();
                    stored += 1;
                    BLOCKS_INGESTED.inc();
                    CACHED_TIP.set(height as f64);
                    debug!(height, hash = %block.hash_hex(), evicted = ?evicted, "Block ingested");
                }
                Ok(AddOutcome::ReorgDetected) => {
                    self.state.record_reorg();
                    REORGS_DETECTED.inc();
                    warn!(
                        height,
                        hash = %block.hash_hex(),
                        reorg_count = self.state.reorg_count,
                        "Reorg detected"
                    );
                }
                Err(CacheError::HeightGap { expected, got }) => {
                    warn!(expected, got, "Cache is behind ingestor, resyncing height");
                    self.state.height = expected;
                }
                Err(e) => {
                    record_error!("ingestor", "encoding");
                    warn!(height, error = %e, "Failed to cache block");
                    if self.fail_and_check_budget() {
                        break RoundOutcome::Abandoned;
                    }
                }
            }
        };

        if stored > 0 {
            info!(
                stored,
                tip = self.state.height.saturating_sub(1),
                "Ingested blocks"
            );
        }
        if outcome == RoundOutcome::Abandoned {
            warn!(
                height = self.state.height,
                "Too many consecutive failures, waiting for next round"
            );
        }
        Ok(outcome)
    }

    /// Count a failure. True when the round should be abandoned; the
    /// counter then starts over for the next round.
    fn fail_and_check_budget(&mut self) -> bool {
        if self.state.record_failure() >= self.config.max_failures {
            self.state.failure_count = 0;
            return true;
        }
        false
    }
}

//! # Ingestor State
//!
//! The three counters the poll loop carries between iterations.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::BlockHeight;

/// How often the node is polled for new blocks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
/// Heights stepped back per reorg round.
pub const DEFAULT_REWIND_STEP: u64 = 10;
/// Reorg rounds tolerated before the ingestor gives up.
pub const DEFAULT_MAX_REORG_ROUNDS: u32 = 10;
/// Consecutive failures that end a poll round.
pub const DEFAULT_MAX_FAILURES: u32 = 3;

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestorState {
    /// Next height to fetch.
    pub height: BlockHeight,
    /// Consecutive reorg detections without a clean add.
    pub reorg_count: u32,
    /// Consecutive fetch or add failures.
    pub failure_count: u32,
    /// A reorg was detected and the rewind has not been applied yet.
    pub rewind_pending: bool,
}

impl IngestorState {
    /// Fresh state starting at `height`.
    pub fn starting_at(height: BlockHeight) -> Self {
        Self {
            height,
            reorg_count: 0,
            failure_count: 0,
            rewind_pending: false,
        }
    }

    /// A block was stored: move on and forgive one failure.
    pub fn record_stored(&mut self) {
        self.reorg_count = 0;
        self.rewind_pending = false;
        self.failure_count = self.failure_count.saturating_sub(1);
        self.height += 1;
    }

    /// The block did not extend the cache.
    pub fn record_reorg(&mut self) {
        self.reorg_count += 1;
        self.rewind_pending = true;
    }

    /// A fetch or add failed. Returns the new consecutive count.
    pub fn record_failure(&mut self) -> u32 {
        self.failure_count += 1;
        self.failure_count
    }

    /// Step back `step` heights if a rewind is pending. Returns the new
    /// height when a rewind happened.
    pub fn apply_rewind(&mut self, step: u64) -> Option<BlockHeight> {
        if !self.rewind_pending {
            return None;
        }
        self.rewind_pending = false;
        self.height = self.height.saturating_sub(step);
        Some(self.height)
    }
}

/// How a poll round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The node has nothing at the next height yet.
    CaughtUp,
    /// Too many consecutive failures; retry next round.
    Abandoned,
    /// Shutdown was requested mid-round.
    Stopped,
}

/// Reorg rounds stay within the ceiling.
pub fn invariant_reorg_bounded(state: &IngestorState, max_reorg_rounds: u32) -> bool {
    state.reorg_count <= max_reorg_rounds
}

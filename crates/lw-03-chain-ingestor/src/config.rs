//! # Ingestor Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{
    IngestorError, DEFAULT_MAX_FAILURES, DEFAULT_MAX_REORG_ROUNDS, DEFAULT_POLL_INTERVAL,
    DEFAULT_REWIND_STEP,
};

/// Chain-tip ingestor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestorConfig {
    /// Delay between poll rounds.
    pub poll_interval: Duration,

    /// Heights to step back after a reorg is detected.
    pub rewind_step: u64,

    /// Consecutive reorg rounds tolerated before giving up.
    pub max_reorg_rounds: u32,

    /// Consecutive failed fetches or adds before a round is abandoned.
    pub max_failures: u32,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            rewind_step: DEFAULT_REWIND_STEP,
            max_reorg_rounds: DEFAULT_MAX_REORG_ROUNDS,
            max_failures: DEFAULT_MAX_FAILURES,
        }
    }
}

impl IngestorConfig {
    /// Create a config for testing (fast polling).
    pub fn for_testing() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            ..Self::default()
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), IngestorError> {
        if self.poll_interval.is_zero() {
            return Err(IngestorError::Config("poll_interval must be > 0".into()));
        }
        if self.rewind_step == 0 {
            return Err(IngestorError::Config("rewind_step must be > 0".into()));
        }
        if self.max_failures == 0 {
            return Err(IngestorError::Config("max_failures must be > 0".into()));
        }
        Ok(())
    }
}

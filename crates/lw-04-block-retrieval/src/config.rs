//! # Retrieval Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{RetrievalError, DEFAULT_RANGE_DEADLINE};

/// Retrieval API configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Deadline for a whole range stream when the caller gives none.
    pub range_deadline: Duration,

    /// Blocks buffered between the range producer and its consumer.
    pub channel_capacity: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            range_deadline: DEFAULT_RANGE_DEADLINE,
            channel_capacity: 16,
        }
    }
}

impl RetrievalConfig {
    /// Create a config for testing (tiny buffer).
    pub fn for_testing() -> Self {
        Self {
            range_deadline: Duration::from_secs(5),
            channel_capacity: 1,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.channel_capacity == 0 {
            return Err(RetrievalError::Config("channel_capacity must be > 0".into()));
        }
        if self.range_deadline.is_zero() {
            return Err(RetrievalError::Config("range_deadline must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deadline_is_thirty_seconds() {
        let config = RetrievalConfig::default();
        assert_eq!(config.range_deadline, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = RetrievalConfig {
            channel_capacity: 0,
            ..RetrievalConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

//! # Block Cache Configuration

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_MAX_ENTRIES;

/// Block cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockCacheConfig {
    /// Capacity of the window. Fixed for the lifetime of the cache.
    pub max_entries: u64,
}

impl Default for BlockCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl BlockCacheConfig {
    /// Create a config for testing (tiny window).
    pub fn for_testing() -> Self {
        Self { max_entries: 3 }
    }

    /// Reject capacities the cache cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("max_entries must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlockCacheConfig::default();
        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = BlockCacheConfig { max_entries: 0 };
        assert!(config.validate().is_err());
    }
}

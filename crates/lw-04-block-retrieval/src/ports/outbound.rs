//! # Outbound Ports
//!
//! Reads go to the cache first; only evicted historical heights reach the
//! [`BlockSource`].

pub use lw_01_block_cache::BlockCacheApi;
pub use shared_types::BlockSource;

//! # Outbound Ports
//!
//! - [`BlockSource`]: where blocks come from. `Ok(None)` means the node has
//!   not mined the height yet.
//! - [`BlockCacheApi`]: where they go. Only the ingestor calls `add`.

pub use lw_01_block_cache::BlockCacheApi;
pub use shared_types::BlockSource;

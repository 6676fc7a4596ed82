//! # LW-04 Block Retrieval
//!
//! Read side of the server: single blocks and streamed ranges for wallets.
//!
//! **Subsystem ID:** 4  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Tip Policy
//!
//! | Request | Answer |
//! |---------|--------|
//! | nothing cached yet | `NotReady` |
//! | resident in the cache | cached copy, no node call |
//! | above the cached tip | `NewerThanTip`, never fetched |
//! | at or below the tip, evicted | fetched from the node, not cached |
//!
//! Blocks above the tip have not been hash-checked by the ingestor, so they
//! are never served even when the node already has them.
//!
//! ## Ranges
//!
//! [`BlockRetrievalApi::get_block_range`] returns a [`BlockRangeStream`] fed
//! by a spawned producer over a bounded channel. The stream ends after the
//! first error. Dropping or closing the stream stops the producer; a
//! deadline aborts it with `DeadlineExceeded`.
//!
//! ## Module Structure
//!
//! ```text
//! lw-04-block-retrieval/
//! ├── domain/          # RetrievalError, BlockRangeStream
//! ├── ports/           # BlockRetrievalApi (inbound) + BlockSource, BlockCacheApi (outbound)
//! ├── service.rs       # BlockRetrievalService
//! └── config.rs        # RetrievalConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use config::RetrievalConfig;
pub use domain::{BlockRangeStream, RetrievalError, DEFAULT_RANGE_DEADLINE};
pub use ports::BlockRetrievalApi;
pub use service::BlockRetrievalService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # LW-03 Chain-Tip Ingestor
//!
//! Background task that walks the node's best chain one height at a time
//! and feeds it into the block cache.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Poll Round
//!
//! ```text
//!            ┌───────────── stored: height += 1 ─────────────┐
//!            ▼                                                │
//! ┌──► rewind if reorg ──► fetch(height) ──► cache.add ───────┘
//! │         pending           │    │              │
//! │                           │    │              └─ reorg: reorg_count += 1
//! │                           │    └─ error: failures += 1, give up at budget
//! │                           └─ not mined yet: end of round
//! └──────────────────────────────────────────────────────────────
//! ```
//!
//! Rounds run every poll interval until the shutdown signal flips. More
//! consecutive reorg rounds than the configured ceiling stop the ingestor
//! with [`IngestorError::ReorgTooDeep`].
//!
//! ## Module Structure
//!
//! ```text
//! lw-03-chain-ingestor/
//! ├── domain/          # IngestorState, RoundOutcome, errors
//! ├── ports/           # BlockSource + BlockCacheApi (outbound)
//! ├── service.rs       # ChainIngestor
//! └── config.rs        # IngestorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use config::IngestorConfig;
pub use domain::{
    invariant_reorg_bounded, IngestorError, IngestorState, RoundOutcome, DEFAULT_MAX_FAILURES,
    DEFAULT_MAX_REORG_ROUNDS, DEFAULT_POLL_INTERVAL, DEFAULT_REWIND_STEP,
};
pub use service::ChainIngestor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

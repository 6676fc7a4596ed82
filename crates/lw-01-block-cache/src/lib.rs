//! # LW-01 Block Cache
//!
//! Bounded, height-indexed sliding window of recent compact blocks.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Guarantees
//!
//! | Property | Enforcement |
//! |----------|-------------|
//! | Gap-free heights | `add` only accepts `last + 1`, a resident height, or a height below the window |
//! | Hash linkage | a block is stored only if its `prev_hash` matches the entry at `height - 1` |
//! | Bounded memory | oldest entry evicted once the window exceeds `max_entries` |
//! | Reader isolation | readers get freshly decoded copies, never references into storage |
//!
//! One writer (the ingestor) calls `add`; any number of readers call `get` and
//! `latest_height` concurrently. All access goes through a single
//! `parking_lot::RwLock`; nothing holds it across I/O.
//!
//! ## Module Structure
//!
//! ```text
//! lw-01-block-cache/
//! ├── domain/          # Window, CacheEntry, AddOutcome, errors, invariants
//! ├── ports/           # BlockCacheApi (inbound) + EntryCodec (outbound)
//! ├── adapters/        # BincodeEntryCodec
//! ├── service.rs       # BlockCache
//! └── config.rs        # BlockCacheConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::BincodeEntryCodec;
pub use config::BlockCacheConfig;
pub use domain::{
    invariant_linked, invariant_window_bounded, AddOutcome, CacheEntry, CacheError, CodecError,
    Window, DEFAULT_MAX_ENTRIES,
};
pub use ports::{BlockCacheApi, EntryCodec};
pub use service::BlockCache;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

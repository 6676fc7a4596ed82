//! # Ports Layer
//!
//! The ingestor has no inbound API of its own; it is driven by
//! [`crate::ChainIngestor::run`].

pub mod outbound;

pub use outbound::{BlockCacheApi, BlockSource};

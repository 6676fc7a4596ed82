//! # Shared Types Crate
//!
//! Types that cross subsystem boundaries in the light wallet server.
//!
//! ## Contents
//!
//! - **Entities**: `CompactBlock`, `CompactTx`, `CompactSpend`, `CompactOutput`
//!   and the `Hash`/`BlockHeight` aliases.
//! - **Block source**: the `BlockSource` trait every consumer of node blocks
//!   depends on, plus `SourceError`.
//! - **Mocks**: an in-memory `MockBlockSource` and `ChainBuilder` used by the
//!   subsystem test suites.
//!
//! ## Byte Order
//!
//! Hashes are held in internal byte order (as hashed). Node RPCs and wallet
//! clients exchange them as byte-reversed hex; use [`hash_to_hex`] and
//! [`hash_from_hex`] at those edges.

pub mod entities;
pub mod errors;
pub mod mock;
pub mod source;

pub use entities::*;
pub use errors::*;
pub use mock::{ChainBuilder, MockBlockSource};
pub use source::BlockSource;

//! # Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::BlockRetrievalApi;
pub use outbound::{BlockCacheApi, BlockSource};

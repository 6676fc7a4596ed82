//! # Ports Layer
//!
//! - **Inbound**: `BlockCacheApi`, what the ingestor and retrieval API call.
//! - **Outbound**: `EntryCodec`, how entries are encoded.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;

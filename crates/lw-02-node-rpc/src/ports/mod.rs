//! # Ports Layer
//!
//! - **Inbound**: `NodeRpcApi`, the typed node operations.
//! - **Outbound**: `RpcTransport` (raw JSON-RPC calls) and `BlockParser`.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;

//! # LW-02 Node RPC
//!
//! Everything that talks to the full node.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Node Methods
//!
//! | Method | Used for |
//! |--------|----------|
//! | `getblock <height> 0` | raw block bytes, parsed into a compact block |
//! | `getblockchaininfo` | chain name, Sapling activation, branch id |
//! | `sendrawtransaction` | relaying wallet transactions |
//! | `getaddresstxids` | transparent address history |
//! | `getaddressutxos` | transparent address balance |
//! | `getrawtransaction` | single transaction lookup |
//!
//! Node errors are reduced to `<code>: <message>`. Code `-8` on `getblock`
//! means the height is not mined yet and is reported as `Ok(None)`.
//!
//! ## Module Structure
//!
//! ```text
//! lw-02-node-rpc/
//! ├── domain/          # RpcFailure, ChainInfo, AddressUtxo, errors
//! ├── parser/          # Block and transaction wire format
//! ├── ports/           # NodeRpcApi (inbound) + RpcTransport, BlockParser (outbound)
//! ├── adapters/        # HttpRpcTransport (reqwest)
//! ├── service.rs       # NodeRpcClient
//! └── config.rs        # NodeRpcConfig, zcash.conf loading
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod parser;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::HttpRpcTransport;
pub use config::NodeRpcConfig;
pub use domain::{
    codes, AddressTxidsRequest, AddressUtxo, ChainInfo, NodeRpcError, ParseError, RawTransactionInfo,
    RpcFailure, SendOutcome, SAPLING_BRANCH_ID,
};
pub use parser::ZcashBlockParser;
pub use ports::{BlockParser, MockTransport, NodeRpcApi, RpcTransport};
pub use service::NodeRpcClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

//! # LW-05 Wallet Gateway
//!
//! The wallet-facing front end: JSON-RPC 2.0 over HTTP, backed by the
//! retrieval API for blocks and the node client for everything else.
//!
//! **Subsystem ID:** 5  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Endpoints
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /` | unary methods, single or batch |
//! | `POST /stream` | streaming methods, newline-delimited responses |
//! | `GET /health` | liveness |
//! | `GET /metrics` | Prometheus text |
//! | `GET /params/{file}` | 301 to the parameter mirror |
//!
//! ## Methods
//!
//! | Method | Kind | Backed by |
//! |--------|------|-----------|
//! | `GetLatestBlock` | unary | cache tip |
//! | `GetBlock` | unary | cache, node for evicted heights |
//! | `GetBlockRange` | streaming | cache, node for evicted heights |
//! | `GetTransaction` | unary | `getrawtransaction` |
//! | `SendTransaction` | unary | `sendrawtransaction` |
//! | `GetAddressTxids` | streaming | `getaddresstxids` + `getrawtransaction` |
//! | `GetUtxos` | streaming | `getaddressutxos` |
//! | `GetLightdInfo` | unary | `getblockchaininfo` |
//!
//! A stream ends after its first error, which is sent as the last line.
//!
//! ## Module Structure
//!
//! ```text
//! lw-05-wallet-gateway/
//! ├── domain/          # ApiError, wallet types, GatewayConfig, method table
//! ├── ports/           # NodeRpcApi, BlockRetrievalApi (outbound)
//! ├── rpc/             # WalletRpc handlers
//! ├── middleware/      # CORS
//! ├── router.rs        # method dispatch, param parsing
//! └── service.rs       # WalletGatewayService (axum server)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Errors, wallet types, configuration and the method table.
pub mod domain;
/// HTTP layers.
pub mod middleware;
/// Ports onto the node client and the retrieval API.
pub mod ports;
/// JSON-RPC dispatch.
pub mod router;
/// Method handlers.
pub mod rpc;
/// The axum server.
pub mod service;

// Re-exports
pub use domain::config::{CorsConfig, GatewayConfig};
pub use domain::error::{codes, ApiError, ApiResult, GatewayError};
pub use domain::types::*;
pub use rpc::WalletRpc;
pub use service::{WalletGatewayService, PARAM_FILES};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

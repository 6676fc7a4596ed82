//! # Lightwalletd Runtime
//!
//! Wires the subsystems into one process:
//!
//! ```text
//!                 ┌──────────────┐
//!   full node ◄───┤ NodeRpcClient├──────────────┐
//!                 └──────┬───────┘              │
//!                        │ fetch_block          │ tx / chain queries
//!              ┌─────────▼────────┐             │
//!              │ ChainIngestor(3) │             │
//!              └─────────┬────────┘             │
//!                        │ add                  │
//!                 ┌──────▼──────┐  get   ┌──────┴─────────────┐
//!                 │ BlockCache(1)├───────► BlockRetrieval(4)  │
//!                 └─────────────┘        └──────┬─────────────┘
//!                                               │
//!                                       ┌───────▼────────┐
//!                                       │ WalletGateway(5)│◄── wallets
//!                                       └────────────────┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Parse flags (`LWD_*` environment fallbacks), read zcash.conf
//! 2. Initialize logging and metrics
//! 3. Query `getblockchaininfo`; start at `max(resume height, Sapling activation)`
//! 4. Bind the gateway, spawn the ingestor and the server
//! 5. Run until Ctrl+C or a fatal ingestor error

pub mod config;
pub mod runtime;
pub mod start_height;

pub use config::{Args, ConfigError, RuntimeConfig};
pub use runtime::Lightwalletd;
pub use start_height::resolve_start_height;

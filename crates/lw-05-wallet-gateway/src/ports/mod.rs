//! Outbound ports for the wallet gateway.
//!
//! The gateway drives the node client directly for transaction and chain
//! queries and the retrieval API for blocks.

pub use lw_02_node_rpc::NodeRpcApi;
pub use lw_04_block_retrieval::BlockRetrievalApi;

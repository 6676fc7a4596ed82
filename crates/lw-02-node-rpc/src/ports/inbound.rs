//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{BlockHeight, CompactBlock, Hash};

use crate::domain::{
    AddressTxidsRequest, AddressUtxo, ChainInfo, NodeRpcError, RawTransactionInfo, SendOutcome,
};

/// Typed full-node operations - inbound port.
#[async_trait]
pub trait NodeRpcApi: Send + Sync {
    /// Fetch and parse the block at `height`. `Ok(None)` if not mined yet.
    async fn get_block(&self, height: BlockHeight) -> Result<Option<CompactBlock>, NodeRpcError>;

    /// Chain name, tip height, Sapling activation and branch id.
    async fn get_chain_info(&self) -> Result<ChainInfo, NodeRpcError>;

    /// Relay a serialized transaction. Node rejections are returned as a
    /// [`SendOutcome`] with a non-zero code, not as an error.
    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<SendOutcome, NodeRpcError>;

    /// Txids touching the given addresses within a height range, internal byte order.
    async fn get_address_txids(
        &self,
        request: &AddressTxidsRequest,
    ) -> Result<Vec<Hash>, NodeRpcError>;

    /// Unspent outputs of a transparent address.
    async fn get_address_utxos(&self, address: &str) -> Result<Vec<AddressUtxo>, NodeRpcError>;

    /// A transaction by txid (internal byte order). `Ok(None)` if unknown.
    async fn get_raw_transaction(
        &self,
        txid: &Hash,
    ) -> Result<Option<RawTransactionInfo>, NodeRpcError>;
}

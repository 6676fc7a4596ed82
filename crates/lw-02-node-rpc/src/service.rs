//! # Node RPC Client
//!
//! Typed operations over an [`RpcTransport`], with raw blocks run through a
//! [`BlockParser`]. Also serves as the ingestor's [`BlockSource`].

use async_trait::async_trait;
use serde_json::{json, Value};
use shared_types::{hash_from_hex, hash_to_hex, BlockHeight, BlockSource, CompactBlock, Hash, SourceError};
use tracing::{debug, warn};

use crate::domain::{
    AddressTxidsRequest, AddressUtxo, ChainInfo, NodeRpcError, RawTransactionInfo, SendOutcome,
};
use crate::parser::ZcashBlockParser;
use crate::ports::{BlockParser, NodeRpcApi, RpcTransport};

/// Full-node client.
pub struct NodeRpcClient<T: RpcTransport, P: BlockParser = ZcashBlockParser> {
    transport: T,
    parser: P,
}

impl<T: RpcTransport> NodeRpcClient<T> {
    /// Client parsing blocks with the Zcash wire format.
    pub fn new(transport: T) -> Self {
        Self::with_parser(transport, ZcashBlockParser)
    }
}

impl<T: RpcTransport, P: BlockParser> NodeRpcClient<T, P> {
    /// Client with a custom parser.
    pub fn with_parser(transport: T, parser: P) -> Self {
        Self { transport, parser }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

fn expect_str<'a>(method: &str, value: &'a Value) -> Result<&'a str, NodeRpcError> {
    value
        .as_str()
        .ok_or_else(|| NodeRpcError::Decode(format!("{}: expected a string result", method)))
}

#[async_trait]
impl<T: RpcTransport, P: BlockParser> NodeRpcApi for NodeRpcClient<T, P> {
    async fn get_block(&self, height: BlockHeight) -> Result<Option<CompactBlock>, NodeRpcError> {
        let params = vec![json!(height.to_string()), json!(0)];
        let result = match self.transport.call("getblock", params).await {
            Ok(value) => value,
            Err(err) if err.is_not_yet_available() => {
                debug!(height, "Block not mined yet");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let raw = hex::decode(expect_str("getblock", &result)?)
            .map_err(|e| NodeRpcError::Decode(format!("getblock hex: {}", e)))?;
        let block = self
            .parser
            .parse(&raw, height)
            .map_err(|source| NodeRpcError::Parse { height, source })?;
        Ok(Some(block))
    }

    async fn get_chain_info(&self) -> Result<ChainInfo, NodeRpcError> {
        let result = self.transport.call("getblockchaininfo", vec![]).await?;
        ChainInfo::from_json(result)
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<SendOutcome, NodeRpcError> {
        match self
            .transport
            .call("sendrawtransaction", vec![json!(hex::encode(raw_tx))])
            .await
        {
            Ok(result) => Ok(SendOutcome {
                code: 0,
                message: expect_str("sendrawtransaction", &result)?.to_string(),
            }),
            Err(NodeRpcError::Rpc(failure)) => {
                warn!(code = failure.code, reason = %failure.message, "Node rejected transaction");
                Ok(SendOutcome {
                    code: failure.code,
                    message: failure.message,
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn get_address_txids(
        &self,
        request: &AddressTxidsRequest,
    ) -> Result<Vec<Hash>, NodeRpcError> {
        let params = json!({
            "addresses": request.addresses,
            "start": request.start,
            "end": request.end,
        });
        let result = self.transport.call("getaddresstxids", vec![params]).await?;
        let txids: Vec<String> = serde_json::from_value(result)
            .map_err(|e| NodeRpcError::Decode(format!("getaddresstxids: {}", e)))?;
        txids
            .iter()
            .map(|txid| {
                hash_from_hex(txid).map_err(|e| NodeRpcError::Decode(format!("txid: {}", e)))
            })
            .collect()
    }

    async fn get_address_utxos(&self, address: &str) -> Result<Vec<AddressUtxo>, NodeRpcError> {
        let params = json!({ "addresses": [address] });
        let result = self.transport.call("getaddressutxos", vec![params]).await?;
        AddressUtxo::list_from_json(result)
    }

    async fn get_raw_transaction(
        &self,
        txid: &Hash,
    ) -> Result<Option<RawTransactionInfo>, NodeRpcError> {
        let params = vec![json!(hash_to_hex(txid)), json!(1)];
        match self.transport.call("getrawtransaction", params).await {
            Ok(result) => RawTransactionInfo::from_json(result).map(Some),
            Err(NodeRpcError::Rpc(failure)) if failure.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl<T: RpcTransport, P: BlockParser> BlockSource for NodeRpcClient<T, P> {
    async fn fetch_block(&self, height: BlockHeight) -> Result<Option<CompactBlock>, SourceError> {
        self.get_block(height).await.map_err(SourceError::from)
    }
}

//! # Node Response Types
//!
//! Typed views of the JSON the node returns. Wire structs stay private; the
//! public types carry hashes in internal byte order and scripts as bytes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared_types::{hash_from_hex, BlockHeight, Hash};

use super::errors::NodeRpcError;

/// Network upgrade id of Sapling in `getblockchaininfo.upgrades`.
pub const SAPLING_BRANCH_ID: &str = "76b809bb";

/// Chain facts reported by `getblockchaininfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// `main`, `test` or `regtest`.
    pub chain_name: String,
    /// Node's current best height.
    pub block_height: BlockHeight,
    /// Sapling activation height, absent when the node does not schedule it.
    pub sapling_activation_height: Option<BlockHeight>,
    /// Branch id the next block will be validated under.
    pub consensus_branch_id: String,
}

#[derive(Deserialize)]
struct BlockchainInfoWire {
    chain: String,
    blocks: BlockHeight,
    #[serde(default)]
    upgrades: HashMap<String, UpgradeWire>,
    consensus: ConsensusWire,
}

#[derive(Deserialize)]
struct UpgradeWire {
    activationheight: BlockHeight,
}

#[derive(Deserialize)]
struct ConsensusWire {
    nextblock: String,
}

impl ChainInfo {
    /// Decode a `getblockchaininfo` result.
    pub fn from_json(value: serde_json::Value) -> Result<Self, NodeRpcError> {
        let wire: BlockchainInfoWire = serde_json::from_value(value)
            .map_err(|e| NodeRpcError::Decode(format!("getblockchaininfo: {}", e)))?;
        Ok(Self {
            chain_name: wire.chain,
            block_height: wire.blocks,
            sapling_activation_height: wire
                .upgrades
                .get(SAPLING_BRANCH_ID)
                .map(|u| u.activationheight),
            consensus_branch_id: wire.consensus.nextblock,
        })
    }
}

/// Filter for `getaddresstxids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressTxidsRequest {
    /// Transparent addresses to search.
    pub addresses: Vec<String>,
    /// First height, inclusive.
    pub start: BlockHeight,
    /// Last height, inclusive.
    pub end: BlockHeight,
}

/// An unspent transparent output from `getaddressutxos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressUtxo {
    /// Owning address.
    pub address: String,
    /// Funding transaction id, internal byte order.
    pub txid: Hash,
    /// Output position in the funding transaction.
    pub output_index: u64,
    /// Locking script.
    pub script: Vec<u8>,
    /// Value in zatoshis.
    pub value_zat: i64,
    /// Height of the funding block.
    pub height: BlockHeight,
}

#[derive(Deserialize)]
struct UtxoWire {
    address: String,
    txid: String,
    #[serde(rename = "outputIndex")]
    output_index: u64,
    script: String,
    satoshis: i64,
    height: BlockHeight,
}

impl AddressUtxo {
    /// Decode a `getaddressutxos` result.
    pub fn list_from_json(value: serde_json::Value) -> Result<Vec<Self>, NodeRpcError> {
        let wire: Vec<UtxoWire> = serde_json::from_value(value)
            .map_err(|e| NodeRpcError::Decode(format!("getaddressutxos: {}", e)))?;
        wire.into_iter()
            .map(|u| {
                Ok(Self {
                    txid: hash_from_hex(&u.txid)
                        .map_err(|e| NodeRpcError::Decode(format!("utxo txid: {}", e)))?,
                    script: hex::decode(&u.script)
                        .map_err(|e| NodeRpcError::Decode(format!("utxo script: {}", e)))?,
                    address: u.address,
                    output_index: u.output_index,
                    value_zat: u.satoshis,
                    height: u.height,
                })
            })
            .collect()
    }
}

/// A transaction from `getrawtransaction <txid> 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionInfo {
    /// Serialized transaction.
    pub data: Vec<u8>,
    /// Mined height, `None` while in the mempool.
    pub height: Option<BlockHeight>,
}

#[derive(Deserialize)]
struct RawTransactionWire {
    hex: String,
    #[serde(default)]
    height: Option<i64>,
}

impl RawTransactionInfo {
    /// Decode a verbose `getrawtransaction` result.
    pub fn from_json(value: serde_json::Value) -> Result<Self, NodeRpcError> {
        let wire: RawTransactionWire = serde_json::from_value(value)
            .map_err(|e| NodeRpcError::Decode(format!("getrawtransaction: {}", e)))?;
        Ok(Self {
            data: hex::decode(&wire.hex)
                .map_err(|e| NodeRpcError::Decode(format!("transaction hex: {}", e)))?,
            height: wire.height.and_then(|h| u64::try_from(h).ok()),
        })
    }
}

/// What the node said about a relayed transaction.
///
/// Code 0 with the txid as message means accepted; anything else is the
/// node's rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    /// 0 on success, the node's error code otherwise.
    pub code: i64,
    /// Txid on success, the node's reason otherwise.
    pub message: String,
}

impl SendOutcome {
    /// True when the node accepted the transaction.
    pub fn is_accepted(&self) -> bool {
        self.code == 0
    }
}

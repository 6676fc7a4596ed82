//! # Wallet API Types
//!
//! JSON shapes exchanged with wallets. Block hashes and txids are rendered
//! as byte-reversed hex; note fields and raw transactions as plain hex.

use lw_02_node_rpc::{AddressUtxo, ChainInfo, RawTransactionInfo, SendOutcome};
use serde::{Deserialize, Serialize};
use shared_types::{
    hash_to_hex, BlockHeight, CompactBlock, CompactOutput, CompactSpend, CompactTx,
};

/// Identifies a block by height or hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockId {
    /// Block height; 0 means "not given".
    #[serde(default)]
    pub height: BlockHeight,
    /// Byte-reversed hex block hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl BlockId {
    /// A height-only identifier.
    pub fn at(height: BlockHeight) -> Self {
        Self { height, hash: None }
    }
}

/// Inclusive block range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    /// First block to return
    pub start: BlockId,
    /// Last block to return
    pub end: BlockId,
}

/// Selects a transaction. Only `hash` is honored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxFilter {
    /// Containing block
    #[serde(default)]
    pub block: Option<BlockId>,
    /// Index within the block
    #[serde(default)]
    pub index: u64,
    /// Byte-reversed hex txid
    #[serde(default)]
    pub hash: Option<String>,
}

/// Serialized transaction plus the height it was mined at (0 if unmined).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Hex-encoded transaction bytes
    pub data: String,
    /// Mined height, 0 while in the mempool
    #[serde(default)]
    pub height: BlockHeight,
}

impl From<RawTransactionInfo> for RawTransaction {
    fn from(info: RawTransactionInfo) -> Self {
        Self {
            data: hex::encode(info.data),
            height: info.height.unwrap_or(0),
        }
    }
}

/// Relay result: code 0 and the txid on acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    /// 0 on success, the node's error code otherwise
    pub error_code: i64,
    /// Txid on success, the node's reason otherwise
    pub error_message: String,
}

impl From<SendOutcome> for SendResponse {
    fn from(outcome: SendOutcome) -> Self {
        Self {
            error_code: outcome.code,
            error_message: outcome.message,
        }
    }
}

/// A transparent address with an optional height range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparentAddressBlockFilter {
    /// t-address
    pub address: String,
    /// Heights to search
    pub range: BlockRange,
}

/// A bare transparent address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparentAddress {
    /// t-address
    pub address: String,
}

/// Server and chain facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightdInfo {
    /// Server version string
    pub version: String,
    /// Operator-chosen vendor label
    pub vendor: String,
    /// Transparent address queries are served
    pub taddr_support: bool,
    /// `main`, `test` or `regtest`
    pub chain_name: String,
    /// Sapling activation, 0 when the node does not report one
    pub sapling_activation_height: BlockHeight,
    /// Branch id for the next block
    pub consensus_branch_id: String,
    /// Node's best height
    pub block_height: BlockHeight,
}

impl LightdInfo {
    /// Combine server identity with the node's chain facts.
    pub fn new(version: &str, vendor: &str, chain: ChainInfo) -> Self {
        Self {
            version: version.to_string(),
            vendor: vendor.to_string(),
            taddr_support: true,
            chain_name: chain.chain_name,
            sapling_activation_height: chain.sapling_activation_height.unwrap_or(0),
            consensus_branch_id: chain.consensus_branch_id,
            block_height: chain.block_height,
        }
    }
}

/// An unspent transparent output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Owning address
    pub address: String,
    /// Byte-reversed hex txid
    pub txid: String,
    /// Output index
    pub index: u64,
    /// Hex locking script
    pub script: String,
    /// Value in zatoshi
    pub value_zat: i64,
    /// Mined height
    pub height: BlockHeight,
}

impl From<AddressUtxo> for Utxo {
    fn from(utxo: AddressUtxo) -> Self {
        Self {
            address: utxo.address,
            txid: hash_to_hex(&utxo.txid),
            index: utxo.output_index,
            script: hex::encode(utxo.script),
            value_zat: utxo.value_zat,
            height: utxo.height,
        }
    }
}

/// Wallet view of a compact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBlock {
    /// Compact block format version.
    pub proto_version: u32,
    /// Block height.
    pub height: BlockHeight,
    /// Display-order hex block hash.
    pub hash: String,
    /// Display-order hex hash of the parent.
    pub prev_hash: String,
    /// Header timestamp, Unix seconds.
    pub time: u32,
    /// Hex header bytes; empty when not carried.
    pub header: String,
    /// Shielded transactions only.
    pub vtx: Vec<WalletTx>,
}

/// Wallet view of a compact transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTx {
    /// Position in the block.
    pub index: u64,
    /// Display-order hex txid.
    pub hash: String,
    /// Always zero; fees are not computed.
    pub fee: u32,
    /// Sapling spends.
    pub spends: Vec<WalletSpend>,
    /// Sapling outputs.
    pub outputs: Vec<WalletOutput>,
}

/// Wallet view of a spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSpend {
    /// Hex nullifier.
    pub nf: String,
}

/// Wallet view of an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletOutput {
    /// Hex note commitment.
    pub cmu: String,
    /// Hex ephemeral public key.
    pub epk: String,
    /// Hex of the first 52 ciphertext bytes.
    pub ciphertext: String,
}

impl From<&CompactBlock> for WalletBlock {
    fn from(block: &CompactBlock) -> Self {
        Self {
            proto_version: block.proto_version,
            height: block.height,
            hash: block.hash_hex(),
            prev_hash: block.prev_hash_hex(),
            time: block.time,
            header: hex::encode(&block.header),
            vtx: block.vtx.iter().map(WalletTx::from).collect(),
        }
    }
}

impl From<&CompactTx> for WalletTx {
    fn from(tx: &CompactTx) -> Self {
        Self {
            index: tx.index,
            hash: hash_to_hex(&tx.hash),
            fee: tx.fee,
            spends: tx.spends.iter().map(WalletSpend::from).collect(),
            outputs: tx.outputs.iter().map(WalletOutput::from).collect(),
        }
    }
}

impl From<&CompactSpend> for WalletSpend {
    fn from(spend: &CompactSpend) -> Self {
        Self {
            nf: hex::encode(spend.nf),
        }
    }
}

impl From<&CompactOutput> for WalletOutput {
    fn from(output: &CompactOutput) -> Self {
        Self {
            cmu: hex::encode(output.cmu),
            epk: hex::encode(output.epk),
            ciphertext: hex::encode(&output.ciphertext),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ChainBuilder;

    #[test]
    fn test_block_id_defaults_missing_fields() {
        let id: BlockId = serde_json::from_str("{}").unwrap();
        assert_eq!(id, BlockId::default());
        let id: BlockId = serde_json::from_str(r#"{"height": 42}"#).unwrap();
        assert_eq!(id, BlockId::at(42));
    }

    #[test]
    fn test_wallet_block_uses_display_order_hashes() {
        let block = ChainBuilder::new(1).block(100, [0u8; 32]);
        let view = WalletBlock::from(&block);
        assert_eq!(view.height, 100);
        assert_eq!(view.hash, block.hash_hex());
        assert_eq!(view.prev_hash, hash_to_hex(&[0u8; 32]));
    }

    #[test]
    fn test_utxo_view() {
        let mut txid = [0u8; 32];
        txid[0] = 0xab;
        let utxo = Utxo::from(AddressUtxo {
            address: "t1abc".into(),
            txid,
            output_index: 1,
            script: vec![0x76, 0xa9],
            value_zat: 5000,
            height: 300,
        });
        assert!(utxo.txid.ends_with("ab"));
        assert_eq!(utxo.script, "76a9");
    }

    #[test]
    fn test_lightd_info_without_sapling() {
        let info = LightdInfo::new(
            "0.1",
            "acme",
            ChainInfo {
                chain_name: "regtest".into(),
                block_height: 7,
                sapling_activation_height: None,
                consensus_branch_id: "00000000".into(),
            },
        );
        assert!(info.taddr_support);
        assert_eq!(info.sapling_activation_height, 0);
    }
}

//! # Compact Block Model
//!
//! The per-block data a light client needs: identity, chain linkage and the
//! shielded parts of each transaction. The cache treats transaction summaries
//! as opaque.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::errors::HexError;

/// A 32-byte block or transaction hash in internal byte order.
pub type Hash = [u8; 32];

/// Block height on the node's chain.
pub type BlockHeight = u64;

/// Version of the compact block format produced by the parser.
pub const COMPACT_BLOCK_VERSION: u32 = 1;

/// Bytes of the note ciphertext kept in a compact output.
pub const COMPACT_NOTE_SIZE: usize = 52;

/// A block reduced to what light clients need.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompactBlock {
    /// Compact format version.
    pub proto_version: u32,
    /// Height of this block.
    pub height: BlockHeight,
    /// Double-SHA-256 of the block header.
    pub hash: Hash,
    /// Hash of the parent block.
    pub prev_hash: Hash,
    /// Header timestamp (unix seconds).
    pub time: u32,
    /// Raw header bytes, left empty unless a caller needs them.
    #[serde_as(as = "Bytes")]
    pub header: Vec<u8>,
    /// Transactions with shielded components, in block order.
    pub vtx: Vec<CompactTx>,
}

impl CompactBlock {
    /// True when this block extends a parent with the given hash.
    pub fn extends(&self, parent_hash: &Hash) -> bool {
        &self.prev_hash == parent_hash
    }

    /// Block hash in the reversed hex form nodes print.
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Parent hash in the reversed hex form nodes print.
    pub fn prev_hash_hex(&self) -> String {
        hash_to_hex(&self.prev_hash)
    }
}

/// A transaction reduced to its shielded spends and outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompactTx {
    /// Position of the transaction within its block.
    pub index: u64,
    /// Transaction id in internal byte order.
    pub hash: Hash,
    /// Fee in zatoshis, when known. The parser does not compute it.
    pub fee: u32,
    /// Shielded spends.
    pub spends: Vec<CompactSpend>,
    /// Shielded outputs.
    pub outputs: Vec<CompactOutput>,
}

/// Nullifier revealed by a shielded spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompactSpend {
    /// Nullifier of the spent note.
    pub nf: Hash,
}

/// The parts of a shielded output needed for trial decryption.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompactOutput {
    /// Note commitment u-coordinate.
    pub cmu: Hash,
    /// Ephemeral public key.
    pub epk: Hash,
    /// Leading bytes of the encrypted note.
    #[serde_as(as = "Bytes")]
    pub ciphertext: Vec<u8>,
}

/// Render a hash as byte-reversed hex.
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// Parse byte-reversed hex into a hash in internal order.
pub fn hash_from_hex(s: &str) -> Result<Hash, HexError> {
    let bytes = hex::decode(s).map_err(|e| HexError::Invalid(e.to_string()))?;
    let mut hash: Hash = bytes
        .as_slice()
        .try_into()
        .map_err(|_| HexError::WrongLength {
            expected: 32,
            got: bytes.len(),
        })?;
    hash.reverse();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_hex_is_reversed() {
        let mut hash = [0u8; 32];
        hash[0] = 0xab;
        let hex = hash_to_hex(&hash);
        assert!(hex.ends_with("ab"));
        assert!(hex.starts_with("00"));
    }

    #[test]
    fn test_hash_hex_parse_inverts_render() {
        let mut hash = [0u8; 32];
        hash[3] = 7;
        hash[31] = 9;
        assert_eq!(hash_from_hex(&hash_to_hex(&hash)).unwrap(), hash);
    }

    #[test]
    fn test_hash_from_hex_rejects_short_input() {
        let err = hash_from_hex("abcd").unwrap_err();
        assert_eq!(err, HexError::WrongLength { expected: 32, got: 2 });
    }

    #[test]
    fn test_extends_checks_prev_hash() {
        let block = CompactBlock {
            prev_hash: [5u8; 32],
            ..Default::default()
        };
        assert!(block.extends(&[5u8; 32]));
        assert!(!block.extends(&[6u8; 32]));
    }

    #[test]
    fn test_bincode_keeps_transactions() {
        let block = CompactBlock {
            height: 42,
            vtx: vec![CompactTx {
                index: 1,
                outputs: vec![CompactOutput {
                    ciphertext: vec![1; COMPACT_NOTE_SIZE],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let bytes = bincode::serialize(&block).unwrap();
        let decoded: CompactBlock = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.vtx[0].outputs[0].ciphertext.len(), COMPACT_NOTE_SIZE);
        assert_eq!(decoded.height, 42);
    }
}

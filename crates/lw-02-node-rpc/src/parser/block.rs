use shared_types::{BlockHeight, CompactBlock, CompactTx, Hash, COMPACT_BLOCK_VERSION};
use tracing::trace;

use super::reader::ByteReader;
use super::transaction::{coinbase_height, ParsedTransaction};
use super::double_sha256;
use crate::domain::ParseError;
use crate::ports::BlockParser;

/// Header bytes before the Equihash solution.
pub const HEADER_FIXED_SIZE: usize = 4 + 32 + 32 + 32 + 4 + 4 + 32;

/// Decoded Zcash block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version.
    pub version: i32,
    /// Parent block hash.
    pub prev_hash: Hash,
    /// Transaction merkle root.
    pub merkle_root: Hash,
    /// Sapling note commitment tree root (block commitments after Heartwood).
    pub final_sapling_root: Hash,
    /// Unix timestamp.
    pub time: u32,
    /// Compact difficulty target.
    pub bits: u32,
    /// Equihash nonce.
    pub nonce: Hash,
    /// Double SHA-256 of the serialized header.
    pub hash: Hash,
}

impl BlockHeader {
    fn parse(reader: &mut ByteReader<'_>) -> Result<Self, ParseError> {
        let start = reader.position();
        let mut version = [0u8; 4];
        version.copy_from_slice(reader.take(4, "block version")?);
        let prev_hash = reader.read_hash("prev hash")?;
        let merkle_root = reader.read_hash("merkle root")?;
        let final_sapling_root = reader.read_hash("final sapling root")?;
        let time = reader.read_u32_le("time")?;
        let bits = reader.read_u32_le("bits")?;
        let nonce = reader.read_hash("nonce")?;
        reader.read_var_bytes("equihash solution")?;

        Ok(Self {
            version: i32::from_le_bytes(version),
            prev_hash,
            merkle_root,
            final_sapling_root,
            time,
            bits,
            nonce,
            hash: double_sha256(reader.since(start)),
        })
    }
}

/// Parser for the zcashd block serialization.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZcashBlockParser;

impl BlockParser for ZcashBlockParser {
    fn parse(&self, raw: &[u8], height: BlockHeight) -> Result<CompactBlock, ParseError> {
        let mut reader = ByteReader::new(raw);
        let header = BlockHeader::parse(&mut reader)?;

        let tx_count = reader.read_count("tx count", 4)?;
        if tx_count == 0 {
            return Err(ParseError::MissingCoinbase);
        }

        let mut vtx = Vec::new();
        for index in 0..tx_count {
            let tx = ParsedTransaction::parse(&mut reader)?;
            if index == 0 {
                let script = tx
                    .coinbase_script
                    .as_deref()
                    .ok_or(ParseError::MissingCoinbase)?;
                if height > 0 {
                    if let Some(found) = coinbase_height(script) {
                        if found != height {
                            return Err(ParseError::HeightMismatch {
                                expected: height,
                                found,
                            });
                        }
                    }
                }
            }
            if tx.is_shielded() {
                vtx.push(CompactTx {
                    index: index as u64,
                    hash: tx.txid,
                    fee: 0,
                    spends: tx.spends,
                    outputs: tx.outputs,
                });
            }
        }

        if reader.remaining() != 0 {
            return Err(ParseError::TrailingBytes(reader.remaining()));
        }

        trace!(height, txs = tx_count, shielded = vtx.len(), "Parsed block");
        Ok(CompactBlock {
            proto_version: COMPACT_BLOCK_VERSION,
            height,
            hash: header.hash,
            prev_hash: header.prev_hash,
            time: header.time,
            header: Vec::new(),
            vtx,
        })
    }
}

//! Builders for raw Zcash blocks and transactions, for tests.

use shared_types::{BlockHeight, Hash};

use super::double_sha256;

/// Equihash (200, 9) solution length used by mainnet.
pub const SOLUTION_SIZE: usize = 1344;

/// A serialized block and its header hash.
#[derive(Debug, Clone)]
pub struct RawBlock {
    /// Full block bytes.
    pub bytes: Vec<u8>,
    /// Double SHA-256 of the header.
    pub hash: Hash,
}

impl RawBlock {
    /// Block bytes as the node's `getblock <h> 0` hex.
    pub fn hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

fn push_compact_size(out: &mut Vec<u8>, n: usize) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        _ => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
    }
}

fn height_script(height: BlockHeight) -> Vec<u8> {
    match height {
        0 => vec![0x00],
        1..=16 => vec![0x50 + height as u8],
        _ => {
            let mut bytes = Vec::new();
            let mut v = height;
            while v > 0 {
                bytes.push((v & 0xff) as u8);
                v >>= 8;
            }
            if bytes.last().map_or(false, |b| b & 0x80 != 0) {
                bytes.push(0);
            }
            let mut script = vec![bytes.len() as u8];
            script.extend(bytes);
            script
        }
    }
}

/// Version 1 coinbase committing to `height`.
pub fn coinbase_tx(height: BlockHeight) -> Vec<u8> {
    let mut tx = Vec::new();
    tx.extend_from_slice(&1u32.to_le_bytes());
    push_compact_size(&mut tx, 1);
    tx.extend_from_slice(&[0u8; 32]);
    tx.extend_from_slice(&u32::MAX.to_le_bytes());
    let mut script = height_script(height);
    script.extend_from_slice(b"lightwalletd");
    push_compact_size(&mut tx, script.len());
    tx.extend_from_slice(&script);
    tx.extend_from_slice(&u32::MAX.to_le_bytes());
    push_compact_size(&mut tx, 1);
    tx.extend_from_slice(&625_000_000u64.to_le_bytes());
    push_compact_size(&mut tx, 25);
    tx.extend_from_slice(&[0x76; 25]);
    tx.extend_from_slice(&0u32.to_le_bytes());
    tx
}

/// Version 4 transaction with `spends` spends and `outputs` outputs.
///
/// Spend nullifiers are `[fill; 32]`; outputs carry cmu `fill + 1`, epk
/// `fill + 2` and ciphertext bytes `fill + 3`.
pub fn sapling_tx(spends: usize, outputs: usize, fill: u8) -> Vec<u8> {
    let mut tx = Vec::new();
    tx.extend_from_slice(&(4u32 | 1 << 31).to_le_bytes());
    tx.extend_from_slice(&0x892f_2085u32.to_le_bytes());
    push_compact_size(&mut tx, 0);
    push_compact_size(&mut tx, 0);
    tx.extend_from_slice(&0u32.to_le_bytes());
    tx.extend_from_slice(&0u32.to_le_bytes());
    tx.extend_from_slice(&0i64.to_le_bytes());

    push_compact_size(&mut tx, spends);
    for _ in 0..spends {
        tx.extend_from_slice(&[0u8; 64]);
        tx.extend_from_slice(&[fill; 32]);
        tx.extend_from_slice(&[0u8; 32 + 192 + 64]);
    }

    push_compact_size(&mut tx, outputs);
    for _ in 0..outputs {
        tx.extend_from_slice(&[0u8; 32]);
        tx.extend_from_slice(&[fill.wrapping_add(1); 32]);
        tx.extend_from_slice(&[fill.wrapping_add(2); 32]);
        tx.extend_from_slice(&[fill.wrapping_add(3); 580]);
        tx.extend_from_slice(&[0u8; 80 + 192]);
    }

    push_compact_size(&mut tx, 0);
    if spends + outputs > 0 {
        tx.extend_from_slice(&[0u8; 64]);
    }
    tx
}

/// Version 2 transaction with `joinsplits` Sprout JoinSplits.
pub fn sprout_v2_tx(joinsplits: usize) -> Vec<u8> {
    let mut tx = Vec::new();
    tx.extend_from_slice(&2u32.to_le_bytes());
    push_compact_size(&mut tx, 0);
    push_compact_size(&mut tx, 0);
    tx.extend_from_slice(&0u32.to_le_bytes());
    push_compact_size(&mut tx, joinsplits);
    tx.extend(std::iter::repeat(0u8).take(joinsplits * (1506 + 296)));
    if joinsplits > 0 {
        tx.extend_from_slice(&[0u8; 96]);
    }
    tx
}

/// Serialize a block over `prev_hash` with the given transactions.
pub fn raw_block(prev_hash: Hash, time: u32, txs: &[Vec<u8>]) -> RawBlock {
    let mut header = Vec::new();
    header.extend_from_slice(&4i32.to_le_bytes());
    header.extend_from_slice(&prev_hash);
    header.extend_from_slice(&[0u8; 32]);
    header.extend_from_slice(&[0u8; 32]);
    header.extend_from_slice(&time.to_le_bytes());
    header.extend_from_slice(&0x1d00_ffffu32.to_le_bytes());
    header.extend_from_slice(&[0u8; 32]);
    push_compact_size(&mut header, SOLUTION_SIZE);
    header.extend(std::iter::repeat(0u8).take(SOLUTION_SIZE));

    let hash = double_sha256(&header);
    let mut bytes = header;
    push_compact_size(&mut bytes, txs.len());
    for tx in txs {
        bytes.extend_from_slice(tx);
    }
    RawBlock { bytes, hash }
}

/// `count` linked blocks from `start`, each with a coinbase and one Sapling
/// transaction. `salt` varies the time so forks get different hashes.
pub fn raw_chain(start: BlockHeight, count: usize, parent: Hash, salt: u32) -> Vec<RawBlock> {
    let mut prev = parent;
    (start..start + count as u64)
        .map(|height| {
            let block = raw_block(
                prev,
                1_600_000_000 + salt * 1_000_000 + height as u32,
                &[coinbase_tx(height), sapling_tx(1, 1, height as u8)],
            );
            prev = block.hash;
            block
        })
        .collect()
}

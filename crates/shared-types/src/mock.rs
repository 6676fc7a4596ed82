//! # Mock Block Source
//!
//! In-memory node stand-in for tests across the workspace.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use sha2::{Digest, Sha256};

use crate::entities::{BlockHeight, CompactBlock, Hash, COMPACT_BLOCK_VERSION};
use crate::errors::SourceError;
use crate::source::BlockSource;

/// Scripted node: serves blocks from a map and fails on demand.
#[derive(Default)]
pub struct MockBlockSource {
    blocks: RwLock<BTreeMap<BlockHeight, CompactBlock>>,
    /// Remaining forced failures per height.
    failures: Mutex<HashMap<BlockHeight, u32>>,
    fetched: Mutex<Vec<BlockHeight>>,
}

impl MockBlockSource {
    /// Empty node: every height is "not yet available".
    pub fn new() -> Self {
        Self::default()
    }

    /// Node serving the given blocks.
    pub fn with_blocks(blocks: impl IntoIterator<Item = CompactBlock>) -> Self {
        let source = Self::new();
        source.extend(blocks);
        source
    }

    /// Add or replace blocks. Replacing a height models a reorg on the node.
    pub fn extend(&self, blocks: impl IntoIterator<Item = CompactBlock>) {
        let mut map = self.blocks.write();
        for block in blocks {
            map.insert(block.height, block);
        }
    }

    /// Drop every block at or above `height`.
    pub fn truncate(&self, height: BlockHeight) {
        self.blocks.write().split_off(&height);
    }

    /// Fail the next `times` fetches of `height` with a transport error.
    pub fn fail_at(&self, height: BlockHeight, times: u32) {
        self.failures.lock().insert(height, times);
    }

    /// Fail every fetch of `height`.
    pub fn fail_always(&self, height: BlockHeight) {
        self.fail_at(height, u32::MAX);
    }

    /// Highest height the node can serve.
    pub fn tip(&self) -> Option<BlockHeight> {
        self.blocks.read().keys().next_back().copied()
    }

    /// Heights requested so far, in call order.
    pub fn fetched_heights(&self) -> Vec<BlockHeight> {
        self.fetched.lock().clone()
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().len()
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn fetch_block(&self, height: BlockHeight) -> Result<Option<CompactBlock>, SourceError> {
        self.fetched.lock().push(height);

        {
            let mut failures = self.failures.lock();
            if let Some(remaining) = failures.get_mut(&height) {
                if *remaining > 0 {
                    if *remaining != u32::MAX {
                        *remaining -= 1;
                    }
                    return Err(SourceError::Transport(format!(
                        "mock failure at height {}",
                        height
                    )));
                }
            }
        }

        Ok(self.blocks.read().get(&height).cloned())
    }
}

/// Builds hash-linked synthetic chains. Different salts give different forks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainBuilder {
    salt: u8,
}

impl ChainBuilder {
    /// Builder for the fork identified by `salt`.
    pub fn new(salt: u8) -> Self {
        Self { salt }
    }

    /// Hash every fork agrees on for the parent of a chain's first block.
    pub fn anchor_hash(height: BlockHeight) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(b"anchor");
        hasher.update(height.to_le_bytes());
        hasher.finalize().into()
    }

    /// A single block at `height` on top of `prev_hash`.
    pub fn block(&self, height: BlockHeight, prev_hash: Hash) -> CompactBlock {
        let mut hasher = Sha256::new();
        hasher.update([self.salt]);
        hasher.update(height.to_le_bytes());
        hasher.update(prev_hash);
        CompactBlock {
            proto_version: COMPACT_BLOCK_VERSION,
            height,
            hash: hasher.finalize().into(),
            prev_hash,
            time: 1_700_000_000 + height as u32,
            header: Vec::new(),
            vtx: Vec::new(),
        }
    }

    /// `count` linked blocks starting at `start`.
    pub fn chain(&self, start: BlockHeight, count: usize) -> Vec<CompactBlock> {
        let parent = start.checked_sub(1).map(Self::anchor_hash).unwrap_or([0u8; 32]);
        self.build_from(start, parent, count)
    }

    /// `count` blocks extending `parent`.
    pub fn extend(&self, parent: &CompactBlock, count: usize) -> Vec<CompactBlock> {
        self.build_from(parent.height + 1, parent.hash, count)
    }

    fn build_from(&self, start: BlockHeight, mut parent: Hash, count: usize) -> Vec<CompactBlock> {
        let mut blocks = Vec::with_capacity(count);
        for height in start..start + count as u64 {
            let block = self.block(height, parent);
            parent = block.hash;
            blocks.push(block);
        }
        blocks
    }
}

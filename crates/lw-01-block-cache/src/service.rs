//! # Block Cache Service
//!
//! The `RwLock`-guarded window. `add` takes the write lock for the whole
//! evict/check/insert/evict sequence so readers never see a half-applied
//! update.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{BlockHeight, CompactBlock};
use tracing::{debug, trace, warn};

use crate::adapters::BincodeEntryCodec;
use crate::config::BlockCacheConfig;
use crate::domain::{
    invariant_linked, invariant_window_bounded, AddOutcome, CacheEntry, CacheError, Window,
};
use crate::ports::{BlockCacheApi, EntryCodec};

#[derive(Default)]
struct CacheState {
    window: Option<Window>,
    entries: HashMap<BlockHeight, CacheEntry>,
}

/// In-memory block cache.
pub struct BlockCache<C: EntryCodec = BincodeEntryCodec> {
    max_entries: u64,
    codec: C,
    state: RwLock<CacheState>,
}

impl BlockCache<BincodeEntryCodec> {
    /// Empty cache holding at most `max_entries` blocks.
    pub fn new(max_entries: u64) -> Self {
        Self::with_codec(max_entries, BincodeEntryCodec)
    }

    /// Empty cache from configuration.
    pub fn from_config(config: &BlockCacheConfig) -> Self {
        Self::new(config.max_entries)
    }
}

impl<C: EntryCodec> BlockCache<C> {
    /// Empty cache with a custom entry codec.
    pub fn with_codec(max_entries: u64, codec: C) -> Self {
        Self {
            max_entries: max_entries.max(1),
            codec,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Fixed capacity.
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Number of resident blocks.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// True when no block is resident.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: EntryCodec> BlockCacheApi for BlockCache<C> {
    fn add(&self, height: BlockHeight, block: &CompactBlock) -> Result<AddOutcome, CacheError> {
        // Encode before locking so a codec failure changes nothing.
        let data = self
            .codec
            .encode(block)
            .map_err(|source| CacheError::Encoding { height, source })?;

        let mut guard = self.state.write();
        let CacheState { window, entries } = &mut *guard;
        let window = window.get_or_insert_with(|| Window::primed(height));

        if height < window.first() {
            debug!(
                height,
                first = window.first(),
                "Rewriting below cached window, clearing cache"
            );
            entries.clear();
            *window = Window::primed(height);
        } else if window.contains(height) {
            let dropped = window.truncate_to(height);
            debug!(from = dropped.start, to = dropped.end, "Evicting overwritten tail");
            for stale in dropped {
                entries.remove(&stale);
            }
        } else if height > window.next() {
            return Err(CacheError::HeightGap {
                expected: window.next(),
                got: height,
            });
        }

        if let Some(parent) = height.checked_sub(1).and_then(|h| entries.get(&h)) {
            if !invariant_linked(parent, block) {
                warn!(
                    height,
                    cached_parent = %shared_types::hash_to_hex(&parent.hash),
                    block_parent = %block.prev_hash_hex(),
                    "Parent hash mismatch, not storing block"
                );
                return Ok(AddOutcome::ReorgDetected);
            }
        }

        entries.insert(
            height,
            CacheEntry {
                data,
                hash: block.hash,
            },
        );
        window.push();

        let mut evicted = None;
        if !invariant_window_bounded(window, self.max_entries) {
            if let Some(oldest) = window.pop_front() {
                entries.remove(&oldest);
                evicted = Some(oldest);
            }
        }

        trace!(height, evicted = ?evicted, "Block cached");
        Ok(AddOutcome::Stored { evicted })
    }

    fn get(&self, height: BlockHeight) -> Result<Option<CompactBlock>, CacheError> {
        let data = {
            let state = self.state.read();
            match state.entries.get(&height) {
                Some(entry) => entry.data.clone(),
                None => return Ok(None),
            }
        };

        self.codec
            .decode(&data)
            .map(Some)
            .map_err(|source| CacheError::Encoding { height, source })
    }

    fn latest_height(&self) -> Option<BlockHeight> {
        self.state.read().window.and_then(|w| w.last())
    }

    fn window(&self) -> Option<(BlockHeight, BlockHeight)> {
        let state = self.state.read();
        let window = state.window?;
        window.last().map(|last| (window.first(), last))
    }
}

//! # Inbound Ports
//!
//! Operations the cache offers. Synchronous: the cache never does I/O, so
//! callers can hold no lock across a network call by construction.

use shared_types::{BlockHeight, CompactBlock};

use crate::domain::{AddOutcome, CacheError};

/// Block cache API - inbound port.
pub trait BlockCacheApi: Send + Sync {
    /// Offer `block` for `height`.
    ///
    /// Overwriting a resident height first evicts it and everything above it.
    /// If the block does not extend the cached block at `height - 1` nothing
    /// is stored and [`AddOutcome::ReorgDetected`] is returned.
    fn add(&self, height: BlockHeight, block: &CompactBlock) -> Result<AddOutcome, CacheError>;

    /// Decoded copy of the block at `height`, `None` if not resident.
    fn get(&self, height: BlockHeight) -> Result<Option<CompactBlock>, CacheError>;

    /// Highest resident height, `None` if nothing is cached.
    fn latest_height(&self) -> Option<BlockHeight>;

    /// Resident range as `(first, last)`, `None` if nothing is cached.
    fn window(&self) -> Option<(BlockHeight, BlockHeight)>;
}

impl<T: BlockCacheApi + ?Sized> BlockCacheApi for std::sync::Arc<T> {
    fn add(&self, height: BlockHeight, block: &CompactBlock) -> Result<AddOutcome, CacheError> {
        (**self).add(height, block)
    }

    fn get(&self, height: BlockHeight) -> Result<Option<CompactBlock>, CacheError> {
        (**self).get(height)
    }

    fn latest_height(&self) -> Option<BlockHeight> {
        (**self).latest_height()
    }

    fn window(&self) -> Option<(BlockHeight, BlockHeight)> {
        (**self).window()
    }
}

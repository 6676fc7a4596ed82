//! # Domain Entities
//!
//! The cache window and the entries it holds.

use shared_types::{BlockHeight, Hash};

/// Default window capacity, roughly a month of Zcash blocks.
pub const DEFAULT_MAX_ENTRIES: u64 = 40_000;

/// A cached block: its encoded form plus its hash, kept apart so linkage
/// checks never decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Encoded compact block.
    pub data: Vec<u8>,
    /// Hash of the encoded block.
    pub hash: Hash,
}

/// Heights resident in the cache, as the half-open range `[first, end)`.
///
/// A window with `first == end` is primed but empty: the next accepted
/// block will be stored at `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    first: BlockHeight,
    end: BlockHeight,
}

impl Window {
    /// Empty window whose first block will be `first`.
    pub fn primed(first: BlockHeight) -> Self {
        Self { first, end: first }
    }

    /// Lowest resident height (or the primed start when empty).
    pub fn first(&self) -> BlockHeight {
        self.first
    }

    /// Highest resident height, `None` when empty.
    pub fn last(&self) -> Option<BlockHeight> {
        (self.end > self.first).then(|| self.end - 1)
    }

    /// The height that would extend the window.
    pub fn next(&self) -> BlockHeight {
        self.end
    }

    /// Number of resident heights.
    pub fn len(&self) -> u64 {
        self.end - self.first
    }

    /// True when nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.end == self.first
    }

    /// True when `height` is resident.
    pub fn contains(&self, height: BlockHeight) -> bool {
        height >= self.first && height < self.end
    }

    /// Shrink the window so `height` becomes the next height to fill.
    /// Returns the heights that fell off the tail.
    pub fn truncate_to(&mut self, height: BlockHeight) -> std::ops::Range<BlockHeight> {
        let dropped = height.max(self.first)..self.end;
        self.end = dropped.start;
        dropped
    }

    /// Extend by one height.
    pub fn push(&mut self) {
        self.end += 1;
    }

    /// Drop the oldest height, returning it.
    pub fn pop_front(&mut self) -> Option<BlockHeight> {
        if self.is_empty() {
            return None;
        }
        let evicted = self.first;
        self.first += 1;
        Some(evicted)
    }
}

/// Result of a successful `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The block was stored. `evicted` names the height dropped to keep the
    /// window within capacity, if any.
    Stored {
        /// Height removed from the front of the window
        evicted: Option<BlockHeight>,
    },
    /// The block's parent hash disagrees with the cached block below it.
    /// Nothing was stored.
    ReorgDetected,
}

impl AddOutcome {
    /// True for [`AddOutcome::ReorgDetected`].
    pub fn is_reorg(&self) -> bool {
        matches!(self, AddOutcome::ReorgDetected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primed_window_is_empty() {
        let window = Window::primed(10);
        assert!(window.is_empty());
        assert_eq!(window.last(), None);
        assert_eq!(window.next(), 10);
    }

    #[test]
    fn test_primed_at_zero_has_no_last() {
        let window = Window::primed(0);
        assert_eq!(window.last(), None);
        assert!(!window.contains(0));
    }

    #[test]
    fn test_push_and_pop_front() {
        let mut window = Window::primed(10);
        window.push();
        window.push();
        assert_eq!(window.last(), Some(11));
        assert_eq!(window.pop_front(), Some(10));
        assert_eq!(window.first(), 11);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_truncate_to_returns_dropped_tail() {
        let mut window = Window::primed(10);
        for _ in 0..3 {
            window.push();
        }
        let dropped = window.truncate_to(11);
        assert_eq!(dropped, 11..13);
        assert_eq!(window.last(), Some(10));
    }

    #[test]
    fn test_reorg_outcome_flag() {
        assert!(AddOutcome::ReorgDetected.is_reorg());
        assert!(!AddOutcome::Stored { evicted: None }.is_reorg());
    }
}

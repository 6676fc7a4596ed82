//! # Domain Invariants
//!
//! Checks the window and its entries must satisfy after every `add`.

use std::collections::HashMap;

use shared_types::{BlockHeight, CompactBlock};

use super::entities::{CacheEntry, Window};

/// Invariant: the window never holds more than `max_entries` heights.
pub fn invariant_window_bounded(window: &Window, max_entries: u64) -> bool {
    window.len() <= max_entries
}

/// Invariant: `child` may sit directly above `parent` only if it names
/// `parent`'s hash as its own parent.
pub fn invariant_linked(parent: &CacheEntry, child: &CompactBlock) -> bool {
    child.extends(&parent.hash)
}

/// Invariant: the map holds exactly the heights of the window.
pub fn invariant_entries_match_window(
    window: &Window,
    entries: &HashMap<BlockHeight, CacheEntry>,
) -> bool {
    entries.len() as u64 == window.len() && entries.keys().all(|h| window.contains(*h))
}

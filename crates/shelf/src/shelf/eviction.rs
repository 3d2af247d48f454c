//! Tier-priority eviction for the context shelf
//!
//! Eviction is two-level: tiers are consulted in the fixed order of
//! [`EVICTION_ORDER`], and within the first tier that has entries the least
//! recently accessed one goes. Hot and pinned entries are never candidates.

use super::types::{ShelfEntry, Tier};

/// Tiers eligible for automatic eviction, cheapest first.
///
/// This table alone decides eviction priority, independent of the
/// declaration order of [`Tier`].
pub const EVICTION_ORDER: [Tier; 3] = [Tier::Scratch, Tier::Cold, Tier::Warm];

impl Tier {
    /// Whether entries of this tier may be evicted to make room
    pub fn is_evictable(&self) -> bool {
        EVICTION_ORDER.contains(self)
    }
}

/// Index of the next entry to evict, or `None` if nothing is evictable.
pub(crate) fn select_victim(entries: &[ShelfEntry]) -> Option<usize> {
    EVICTION_ORDER.iter().find_map(|tier| {
        entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.tier == *tier)
            .min_by_key(|(_, e)| e.recency_key())
            .map(|(idx, _)| idx)
    })
}

/// Total size that eviction could free if every candidate went
pub(crate) fn evictable_size(entries: &[ShelfEntry]) -> usize {
    entries
        .iter()
        .filter(|e| e.tier.is_evictable())
        .map(|e| e.size)
        .sum()
}

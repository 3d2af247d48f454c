//! Tiered, capacity-bounded context shelf
//!
//! Content is placed on one of five tiers according to how recently and how
//! critically it is needed. Capacity is measured in approximate tokens (see
//! [`crate::cost`]). When a store would overflow, entries are evicted in the
//! order given by [`EVICTION_ORDER`], least recently accessed first within a
//! tier. Hot and pinned entries are never evicted automatically.
//!
//! The shelf has no internal locking; every method that reads entries for a
//! caller also records an access, so hosts sharing a shelf across threads
//! must serialize all calls, reads included.

use std::fmt;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ShelfConfig;
use crate::cost::{CharRatioCost, CostModel};
use crate::error::{Result, ShelfError};

mod compaction;
pub mod eviction;
mod tag_map;
pub mod types;

pub use compaction::{COMPRESSION_SOURCE, COMPRESSION_HEADER, DEFAULT_PREVIEW_CHARS};
pub use eviction::EVICTION_ORDER;
pub use tag_map::TagMap;
pub use types::{EntryId, ShelfEntry, ShelfSnapshot, Tier, TierUsage};

/// Default shelf capacity in approximate tokens
pub const DEFAULT_CAPACITY: usize = 200_000;

/// The partitioned working set.
pub struct ContextShelf {
    capacity: usize,
    entries: Vec<ShelfEntry>,
    used: usize,
    preview_chars: usize,
    cost: Box<dyn CostModel>,
    clock: Box<dyn Clock>,
    next_seq: u64,
}

impl ContextShelf {
    /// Create a shelf with the default cost model and wall-clock time
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
            used: 0,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            cost: Box::new(CharRatioCost::default()),
            clock: Box::new(SystemClock),
            next_seq: 0,
        }
    }

    /// Create a shelf from the `[shelf]` configuration section
    pub fn with_config(config: &ShelfConfig) -> Self {
        Self::new(config.capacity)
            .with_cost_model(CharRatioCost::new(config.chars_per_token))
            .with_preview_chars(config.preview_chars)
    }

    /// Swap in a different size estimator
    pub fn with_cost_model(mut self, cost: impl CostModel + 'static) -> Self {
        self.cost = Box::new(cost);
        self
    }

    /// Swap in a different time source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Per-entry preview length used by [`ContextShelf::compress`]
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sum of all entry sizes
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.used)
    }

    /// Free space plus everything eviction could clear: the largest store
    /// that can currently succeed
    pub fn reclaimable(&self) -> usize {
        self.remaining() + eviction::evictable_size(&self.entries)
    }

    /// `used / capacity`, or 0.0 for a zero-capacity shelf
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.used as f64 / self.capacity as f64
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate cost of `content` under this shelf's cost model
    pub fn estimate(&self, content: &str) -> usize {
        self.cost.estimate(content)
    }

    /// Look up an entry without counting it as an access
    pub fn get(&self, id: EntryId) -> Option<&ShelfEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Iterate entries in insertion order without counting accesses
    pub fn entries(&self) -> impl Iterator<Item = &ShelfEntry> {
        self.entries.iter()
    }

    /// Store content on the shelf, evicting lower-priority entries if needed.
    ///
    /// Fails with [`ShelfError::Capacity`] when even evicting every scratch,
    /// cold and warm entry would not make room. In that case nothing is
    /// evicted and the shelf is left exactly as it was.
    pub fn store(
        &mut self,
        content: impl Into<String>,
        tier: Tier,
        source: impl Into<String>,
        tags: Option<TagMap>,
    ) -> Result<ShelfEntry> {
        let content = content.into();
        let source = source.into();
        let size = self.cost.estimate(&content);

        let available = self.reclaimable();
        if available < size {
            warn!(
                size,
                remaining = self.remaining(),
                available,
                tier = %tier,
                source = %source,
                "Shelf capacity exhausted"
            );
            return Err(ShelfError::Capacity {
                required: size,
                remaining: available,
            });
        }

        while self.remaining() < size {
            if !self.evict_one() {
                break;
            }
        }

        let now = self.clock.now();
        let seq = self.bump_seq();
        let entry = ShelfEntry::new(content, tier, source, size, tags.unwrap_or_default(), now, seq);
        debug!(id = %entry.id, tier = %tier, size, source = %entry.source, "Stored shelf entry");

        self.used += size;
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Return entries matching `tier` and every pair in `tag_filter`.
    ///
    /// Results are in insertion order. Every returned entry is counted as
    /// accessed: `last_accessed` moves to now and `access_count` goes up by
    /// one. The returned values are copies; later shelf changes do not
    /// affect them.
    pub fn retrieve(&mut self, tier: Option<Tier>, tag_filter: Option<&TagMap>) -> Vec<ShelfEntry> {
        let now = self.clock.now();
        let mut results = Vec::new();

        for entry in self.entries.iter_mut() {
            if tier.is_some_and(|t| entry.tier != t) {
                continue;
            }
            if tag_filter.is_some_and(|f| !entry.tags.contains_all(f)) {
                continue;
            }
            let seq = self.next_seq;
            self.next_seq += 1;
            entry.touch(now, seq);
            results.push(entry.clone());
        }

        debug!(
            tier = ?tier,
            filtered = tag_filter.is_some(),
            matched = results.len(),
            "Retrieved shelf entries"
        );
        results
    }

    /// Move an entry to another tier and count it as an access.
    pub fn promote(&mut self, id: EntryId, new_tier: Tier) -> Result<()> {
        let now = self.clock.now();
        let seq = self.bump_seq();
        let entry = self.entry_mut(id)?;
        debug!(id = %id, from = %entry.tier, to = %new_tier, "Promoting shelf entry");
        entry.tier = new_tier;
        entry.touch(now, seq);
        Ok(())
    }

    /// Move an entry to another tier without touching its access time.
    pub fn demote(&mut self, id: EntryId, new_tier: Tier) -> Result<()> {
        let entry = self.entry_mut(id)?;
        debug!(id = %id, from = %entry.tier, to = %new_tier, "Demoting shelf entry");
        entry.tier = new_tier;
        Ok(())
    }

    /// Current capacity figures and per-tier usage
    pub fn snapshot(&self) -> ShelfSnapshot {
        let tiers = Tier::ALL
            .iter()
            .map(|&tier| {
                let (count, size) = self
                    .entries
                    .iter()
                    .filter(|e| e.tier == tier)
                    .fold((0, 0), |(c, s), e| (c + 1, s + e.size));
                TierUsage { tier, count, size }
            })
            .collect();

        ShelfSnapshot {
            capacity: self.capacity,
            used: self.used,
            remaining: self.remaining(),
            utilization: self.utilization(),
            tiers,
        }
    }

    /// Evict the single least valuable entry. Returns false if none qualify.
    fn evict_one(&mut self) -> bool {
        let Some(idx) = eviction::select_victim(&self.entries) else {
            return false;
        };
        let victim = self.entries.remove(idx);
        self.used -= victim.size;
        info!(
            id = %victim.id,
            tier = %victim.tier,
            size = victim.size,
            source = %victim.source,
            "Evicted shelf entry"
        );
        true
    }

    fn entry_mut(&mut self, id: EntryId) -> Result<&mut ShelfEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ShelfError::EntryNotFound(id))
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl Default for ContextShelf {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for ContextShelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextShelf")
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .field("entries", &self.entries.len())
            .field("preview_chars", &self.preview_chars)
            .finish_non_exhaustive()
    }
}

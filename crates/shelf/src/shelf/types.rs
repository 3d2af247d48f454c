//! Shelf entry types
//!
//! Defines the priority tiers, entry handles and the entry record itself,
//! plus the observability snapshot returned by `ContextShelf::snapshot`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag_map::TagMap;

/// Priority class governing when an entry may be evicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Currently relevant, touched every step
    Hot,
    /// Recently relevant cross-reference material
    Warm,
    /// Background context, only if explicitly referenced
    Cold,
    /// Never evicted: user constraints, invariants
    Pinned,
    /// Overwrite freely: drafts, abandoned plans
    Scratch,
}

impl Tier {
    /// All tiers, in display order
    pub const ALL: [Tier; 5] = [Tier::Hot, Tier::Warm, Tier::Cold, Tier::Pinned, Tier::Scratch];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Hot => "hot",
            Tier::Warm => "warm",
            Tier::Cold => "cold",
            Tier::Pinned => "pinned",
            Tier::Scratch => "scratch",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    /// Case-insensitive, so `HOT` and `hot` both parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hot" => Ok(Tier::Hot),
            "warm" => Ok(Tier::Warm),
            "cold" => Ok(Tier::Cold),
            "pinned" => Ok(Tier::Pinned),
            "scratch" => Ok(Tier::Scratch),
            _ => Err(format!(
                "Unknown tier: {s}. Use hot, warm, cold, pinned, or scratch."
            )),
        }
    }
}

/// Stable handle to an entry on the shelf.
///
/// Retrieval hands out copies; changing an entry's tier goes through the
/// shelf with this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A unit of content held on the shelf.
#[derive(Debug, Clone, Serialize)]
pub struct ShelfEntry {
    pub id: EntryId,
    pub content: String,
    pub tier: Tier,
    /// Where this came from (file, tool, user, ...)
    pub source: String,
    /// Approximate token cost, fixed at creation
    pub size: usize,
    pub tags: TagMap,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u32,
    /// Logical access order; breaks ties between equal timestamps
    #[serde(skip)]
    pub(crate) access_seq: u64,
}

impl ShelfEntry {
    pub(crate) fn new(
        content: String,
        tier: Tier,
        source: String,
        size: usize,
        tags: TagMap,
        now: DateTime<Utc>,
        seq: u64,
    ) -> Self {
        Self {
            id: EntryId::new(),
            content,
            tier,
            source,
            size,
            tags,
            created_at: now,
            last_accessed: now,
            access_count: 0,
            access_seq: seq,
        }
    }

    /// Record an access for LRU purposes
    pub(crate) fn touch(&mut self, now: DateTime<Utc>, seq: u64) {
        self.last_accessed = now;
        self.access_seq = seq;
        self.access_count += 1;
    }

    /// LRU ordering key: older accesses sort first
    pub(crate) fn recency_key(&self) -> (DateTime<Utc>, u64) {
        (self.last_accessed, self.access_seq)
    }
}

/// Entry count and total size of one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierUsage {
    pub tier: Tier,
    pub count: usize,
    pub size: usize,
}

/// Point-in-time shelf status. Advisory only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelfSnapshot {
    pub capacity: usize,
    pub used: usize,
    pub remaining: usize,
    /// `used / capacity`, 0.0 for a zero-capacity shelf
    pub utilization: f64,
    /// One row per tier, in [`Tier::ALL`] order
    pub tiers: Vec<TierUsage>,
}

impl ShelfSnapshot {
    pub fn tier(&self, tier: Tier) -> TierUsage {
        self.tiers
            .iter()
            .copied()
            .find(|u| u.tier == tier)
            .unwrap_or(TierUsage {
                tier,
                count: 0,
                size: 0,
            })
    }
}

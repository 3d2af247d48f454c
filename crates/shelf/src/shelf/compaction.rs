//! Lossy tier compression
//!
//! Collapses every entry of a tier into a single summary entry built from a
//! bounded preview of each original. Detail is lost; the source labels and the
//! opening of each entry survive.

use tracing::{info, warn};

use super::ContextShelf;
use super::tag_map::TagMap;
use super::types::{ShelfEntry, Tier};

/// Source label given to summary entries
pub const COMPRESSION_SOURCE: &str = "compression";

/// First line of every summary entry's content. Not counted in its size.
pub const COMPRESSION_HEADER: &str = "[COMPRESSED SUMMARY]";

/// Default number of characters kept from each compressed entry
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

const SEPARATOR: &str = "\n---\n";
const ELLIPSIS: &str = "...";

impl ContextShelf {
    /// Replace every entry of `tier` with one summary entry in the same tier.
    ///
    /// Returns the original total size minus the summary's size. This is
    /// usually positive but can be negative when the entries were tiny, since
    /// each preview carries its source label. An empty tier is left alone and
    /// yields 0.
    ///
    /// If the summary would push the shelf over capacity the tier is left
    /// untouched and 0 is returned.
    pub fn compress(&mut self, tier: Tier) -> i64 {
        let Some(plan) = self.plan_compression(tier) else {
            return 0;
        };
        let (count, original, summary_size) = (plan.count, plan.original, plan.summary_size);

        let used_after = self.used - original + summary_size;
        if used_after > self.capacity {
            warn!(
                tier = %tier,
                original,
                summary_size,
                capacity = self.capacity,
                "Compression summary would exceed capacity; tier left as is"
            );
            return 0;
        }

        self.entries.retain(|e| e.tier != tier);

        let now = self.clock.now();
        let seq = self.bump_seq();
        let summary = ShelfEntry::new(
            format!("{COMPRESSION_HEADER}\n{}", plan.combined),
            tier,
            COMPRESSION_SOURCE.to_string(),
            summary_size,
            TagMap::new(),
            now,
            seq,
        );

        self.used = used_after;
        self.entries.push(summary);

        let freed = original as i64 - summary_size as i64;
        info!(
            tier = %tier,
            entries = count,
            original,
            summary_size,
            freed,
            "Compressed shelf tier"
        );
        freed
    }

    /// Tokens [`ContextShelf::compress`] would free for `tier` right now,
    /// without changing the shelf. 0 where `compress` would be a no-op.
    pub fn compression_gain(&self, tier: Tier) -> i64 {
        match self.plan_compression(tier) {
            Some(plan) if self.used - plan.original + plan.summary_size <= self.capacity => {
                plan.original as i64 - plan.summary_size as i64
            }
            _ => 0,
        }
    }

    fn plan_compression(&self, tier: Tier) -> Option<CompressionPlan> {
        let (count, original) = self
            .entries
            .iter()
            .filter(|e| e.tier == tier)
            .fold((0usize, 0usize), |(c, s), e| (c + 1, s + e.size));

        if count == 0 {
            return None;
        }

        let combined = summarize(
            self.entries.iter().filter(|e| e.tier == tier),
            self.preview_chars,
        );
        let summary_size = self.cost.estimate(&combined);
        Some(CompressionPlan {
            count,
            original,
            combined,
            summary_size,
        })
    }
}

struct CompressionPlan {
    count: usize,
    original: usize,
    combined: String,
    summary_size: usize,
}

/// `[source]: preview` for each entry, joined by a separator
fn summarize<'a>(entries: impl Iterator<Item = &'a ShelfEntry>, preview_chars: usize) -> String {
    entries
        .map(|e| format!("[{}]: {}", e.source, preview(&e.content, preview_chars)))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// First `limit` characters of `content`, with an ellipsis if anything was cut
fn preview(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &content[..cut]),
        None => content.to_string(),
    }
}

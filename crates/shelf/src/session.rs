//! Context session: the shelf and the index driven together
//!
//! A session owns one shelf and one index and keeps them in step: content fed
//! through the session is stored on the shelf and registered in the index
//! under the same source label, so index queries can be traced back to shelf
//! entries. It also carries the recovery policy the shelf itself refuses to
//! apply: on a capacity failure, compress a tier and retry the store once.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, SessionConfig};
use crate::cost::CharRatioCost;
use crate::error::Result;
use crate::index::{IndexSummary, IndexedItem, RetrievalIndex};
use crate::shelf::{ContextShelf, ShelfEntry, ShelfSnapshot, TagMap, Tier};
use crate::tags::{KeywordTagger, Tag, Tagger};

/// Shelf tag key under which fed content records its source label
pub const SOURCE_TAG: &str = "source";

/// Combined observability view of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub shelf: ShelfSnapshot,
    pub index: IndexSummary,
}

/// Shelf entries and index items that share a source label
#[derive(Debug, Clone)]
pub struct CrossReference<'a> {
    pub entries: Vec<ShelfEntry>,
    pub items: Vec<&'a IndexedItem>,
}

pub struct ContextSession {
    shelf: ContextShelf,
    index: RetrievalIndex,
    tagger: Box<dyn Tagger>,
    config: SessionConfig,
}

impl ContextSession {
    /// Build a session from configuration, with the keyword tagger
    pub fn new(config: &Config) -> Self {
        let shelf = ContextShelf::with_config(&config.shelf);
        let index = RetrievalIndex::new()
            .with_cost_model(CharRatioCost::new(config.shelf.chars_per_token));
        Self::from_parts(shelf, index, config.session.clone())
    }

    /// Assemble a session from an existing shelf and index
    pub fn from_parts(shelf: ContextShelf, index: RetrievalIndex, config: SessionConfig) -> Self {
        Self {
            shelf,
            index,
            tagger: Box::new(KeywordTagger::new()),
            config,
        }
    }

    /// Use a different tagger for [`ContextSession::feed`]
    pub fn with_tagger(mut self, tagger: impl Tagger + 'static) -> Self {
        self.tagger = Box::new(tagger);
        self
    }

    pub fn shelf(&self) -> &ContextShelf {
        &self.shelf
    }

    pub fn shelf_mut(&mut self) -> &mut ContextShelf {
        &mut self.shelf
    }

    pub fn index(&self) -> &RetrievalIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut RetrievalIndex {
        &mut self.index
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Store `content` on the shelf and index it with an automatic tag
    pub fn feed(&mut self, content: &str, source: &str, tier: Tier) -> Result<(ShelfEntry, IndexedItem)> {
        let tag = self.tagger.tag(content, source);
        self.feed_tagged(content, source, tier, tag)
    }

    /// Store `content` on the shelf and index it with the given tag.
    ///
    /// Nothing is indexed if the store fails.
    pub fn feed_tagged(
        &mut self,
        content: &str,
        source: &str,
        tier: Tier,
        tag: Tag,
    ) -> Result<(ShelfEntry, IndexedItem)> {
        let tags = TagMap::new().with(SOURCE_TAG, source);
        let entry = self.store(content, tier, source, Some(tags))?;
        let item = self.index.index_tagged(content, source, tag, None);
        debug!(id = %entry.id, source, tier = %tier, tag = %tag, "Fed content to session");
        Ok((entry, item))
    }

    /// Store on the shelf, compressing the configured tier and retrying once
    /// if the first attempt runs out of capacity.
    ///
    /// The compression only runs when it would make the retry fit. An
    /// evictable tier never qualifies, since its whole size already counts as
    /// reclaimable. When it does not run, the shelf is left exactly as it
    /// was and the original capacity error is returned. A capacity error from
    /// the retry is returned unchanged.
    pub fn store(
        &mut self,
        content: &str,
        tier: Tier,
        source: &str,
        tags: Option<TagMap>,
    ) -> Result<ShelfEntry> {
        match self.shelf.store(content, tier, source, tags.clone()) {
            Err(e) if e.is_capacity() && self.config.retry_after_compress => {
                let compress_tier = self.config.auto_compress_tier;
                if !self.compression_makes_room(compress_tier, content) {
                    debug!(tier = %compress_tier, source, "Compression cannot make room; not retrying");
                    return Err(e);
                }
                let freed = self.shelf.compress(compress_tier);
                info!(
                    tier = %compress_tier,
                    freed,
                    source,
                    "Store hit capacity; compressed and retrying"
                );
                self.shelf.store(content, tier, source, tags)
            }
            result => result,
        }
    }

    fn compression_makes_room(&self, compress_tier: Tier, content: &str) -> bool {
        if compress_tier.is_evictable() {
            return false;
        }
        let gain = self.shelf.compression_gain(compress_tier);
        let needed = self.shelf.estimate(content) as i64;
        gain > 0 && self.shelf.reclaimable() as i64 + gain >= needed
    }

    /// Compress the configured tier if utilization is at or over the
    /// configured threshold. Returns the tokens freed, if it ran.
    pub fn maybe_auto_compress(&mut self) -> Option<i64> {
        if self.shelf.utilization() < self.config.auto_compress_at {
            return None;
        }
        let tier = self.config.auto_compress_tier;
        let freed = self.shelf.compress(tier);
        info!(
            tier = %tier,
            freed,
            utilization = self.shelf.utilization(),
            "Auto-compressed shelf tier"
        );
        Some(freed)
    }

    /// Shelf entries fed under `source` together with its index items.
    ///
    /// The shelf side is a retrieval, so the matched entries count as
    /// accessed.
    pub fn cross_reference(&mut self, source: &str) -> CrossReference<'_> {
        let filter = TagMap::new().with(SOURCE_TAG, source);
        let entries = self.shelf.retrieve(None, Some(&filter));
        CrossReference {
            entries,
            items: self.index.by_source(source),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            shelf: self.shelf.snapshot(),
            index: self.index.summary(),
        }
    }
}

impl Default for ContextSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl fmt::Debug for ContextSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSession")
            .field("shelf", &self.shelf)
            .field("index", &self.index)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

//! Retrieval index over consumed content
//!
//! Every chunk of content is tagged along five independent dimensions and
//! appended to the index. Items are never modified or removed; re-tagging
//! means indexing the content again.
//!
//! All queries are linear scans in insertion order. Except for
//! [`RetrievalIndex::stale`], every query combines its criteria with AND.
//! `stale` ORs across two dimensions: see its docs before
//! "fixing" it.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::cost::{CharRatioCost, CostModel};
use crate::tags::{Kind, Relevance, Scope, Tag, Trust, Volatility};

mod query;
mod summary;

pub use query::TagQuery;
pub use summary::IndexSummary;

/// A chunk of content with its retrieval tag. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedItem {
    pub content: String,
    /// Origin label, e.g. "auth.rs", "grep:handleError", "user"
    pub source: String,
    /// Approximate token cost, always at least 1
    pub size: usize,
    pub tag: Tag,
    pub metadata: BTreeMap<String, String>,
}

impl IndexedItem {
    /// A size of 0 is stored as 1
    pub fn new(content: impl Into<String>, source: impl Into<String>, size: usize, tag: Tag) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            size: size.max(1),
            tag,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Append-only index of tagged content
pub struct RetrievalIndex {
    items: Vec<IndexedItem>,
    cost: Box<dyn CostModel>,
}

impl RetrievalIndex {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cost: Box::new(CharRatioCost::default()),
        }
    }

    /// Use a different size estimator for [`RetrievalIndex::index_raw`]
    pub fn with_cost_model(mut self, cost: impl CostModel + 'static) -> Self {
        self.cost = Box::new(cost);
        self
    }

    /// Append an item. No deduplication.
    pub fn index(&mut self, item: IndexedItem) {
        debug!(source = %item.source, size = item.size, tag = %item.tag, "Indexed item");
        self.items.push(item);
    }

    /// Size, tag and append content in one call
    #[allow(clippy::too_many_arguments)]
    pub fn index_raw(
        &mut self,
        content: impl Into<String>,
        source: impl Into<String>,
        kind: Kind,
        relevance: Relevance,
        volatility: Volatility,
        scope: Scope,
        trust: Trust,
        metadata: Option<BTreeMap<String, String>>,
    ) -> IndexedItem {
        let tag = Tag::new(kind, relevance, volatility, scope, trust);
        self.index_tagged(content, source, tag, metadata)
    }

    /// Like [`RetrievalIndex::index_raw`] with a prebuilt tag
    pub fn index_tagged(
        &mut self,
        content: impl Into<String>,
        source: impl Into<String>,
        tag: Tag,
        metadata: Option<BTreeMap<String, String>>,
    ) -> IndexedItem {
        let content = content.into();
        let size = self.cost.estimate(&content);
        let item = IndexedItem::new(content, source, size, tag)
            .with_metadata(metadata.unwrap_or_default());
        self.index(item.clone());
        item
    }

    /// Items matching every dimension set in `query`
    pub fn query(&self, query: &TagQuery) -> Vec<&IndexedItem> {
        self.items.iter().filter(|i| query.matches(&i.tag)).collect()
    }

    /// Everything tagged `critical`
    pub fn critical(&self) -> Vec<&IndexedItem> {
        self.query(&TagQuery::new().relevance(Relevance::Critical))
    }

    /// Everything that might be outdated.
    ///
    /// NOTE: this is an OR across two dimensions - an item qualifies if its
    /// trust is `stale` *or* its volatility is `stale-risk`. It is the one
    /// query that is not AND-combined, and that is intended.
    pub fn stale(&self) -> Vec<&IndexedItem> {
        self.items
            .iter()
            .filter(|i| i.tag.trust == Trust::Stale || i.tag.volatility == Volatility::StaleRisk)
            .collect()
    }

    /// Exact match on the source label
    pub fn by_source(&self, source: &str) -> Vec<&IndexedItem> {
        self.items.iter().filter(|i| i.source == source).collect()
    }

    pub fn items(&self) -> &[IndexedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_size(&self) -> usize {
        self.items.iter().map(|i| i.size).sum()
    }

    /// Counts and size-weighted histograms for each dimension
    pub fn summary(&self) -> IndexSummary {
        IndexSummary::from_items(&self.items)
    }
}

impl Default for RetrievalIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RetrievalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievalIndex")
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

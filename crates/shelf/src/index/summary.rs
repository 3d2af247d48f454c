//! Size-weighted breakdown of the index by tag dimension

use std::collections::BTreeMap;

use serde::Serialize;

use super::IndexedItem;
use crate::tags::{Kind, Relevance, Scope, Trust, Volatility};

/// Aggregate view of the index.
///
/// Each per-dimension map holds only values that were observed, and sums
/// item *sizes*, not item counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub total_items: usize,
    pub total_size: usize,
    pub by_kind: BTreeMap<Kind, usize>,
    pub by_relevance: BTreeMap<Relevance, usize>,
    pub by_volatility: BTreeMap<Volatility, usize>,
    pub by_scope: BTreeMap<Scope, usize>,
    pub by_trust: BTreeMap<Trust, usize>,
}

impl IndexSummary {
    pub(crate) fn from_items<'a>(items: impl IntoIterator<Item = &'a IndexedItem>) -> Self {
        let mut summary = IndexSummary::default();
        for item in items {
            let tag = &item.tag;
            summary.total_items += 1;
            summary.total_size += item.size;
            *summary.by_kind.entry(tag.kind).or_default() += item.size;
            *summary.by_relevance.entry(tag.relevance).or_default() += item.size;
            *summary.by_volatility.entry(tag.volatility).or_default() += item.size;
            *summary.by_scope.entry(tag.scope).or_default() += item.size;
            *summary.by_trust.entry(tag.trust).or_default() += item.size;
        }
        summary
    }
}

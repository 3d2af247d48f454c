//! Tag query builder
//!
//! Each dimension is optional - when `None`, that dimension is a wildcard.
//! Set dimensions are combined with AND logic, exact match within each.

use serde::Serialize;

use crate::tags::{Kind, Relevance, Scope, Tag, Trust, Volatility};

/// Filter criteria for [`super::RetrievalIndex::query`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagQuery {
    pub kind: Option<Kind>,
    pub relevance: Option<Relevance>,
    pub volatility: Option<Volatility>,
    pub scope: Option<Scope>,
    pub trust: Option<Trust>,
}

impl TagQuery {
    /// Create an empty query (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn relevance(mut self, relevance: Relevance) -> Self {
        self.relevance = Some(relevance);
        self
    }

    pub fn volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = Some(volatility);
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn trust(mut self, trust: Trust) -> Self {
        self.trust = Some(trust);
        self
    }

    /// True when every set dimension equals the tag's value
    pub fn matches(&self, tag: &Tag) -> bool {
        self.kind.is_none_or(|k| tag.kind == k)
            && self.relevance.is_none_or(|r| tag.relevance == r)
            && self.volatility.is_none_or(|v| tag.volatility == v)
            && self.scope.is_none_or(|s| tag.scope == s)
            && self.trust.is_none_or(|t| tag.trust == t)
    }

    /// Check if this query is empty (no dimensions set)
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.relevance.is_none()
            && self.volatility.is_none()
            && self.scope.is_none()
            && self.trust.is_none()
    }
}

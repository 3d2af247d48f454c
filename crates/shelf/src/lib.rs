//! Shelf - bounded working-set management for LLM context
//!
//! This crate provides a tiered, capacity-bounded context shelf that evicts
//! by priority tier, and a five-dimension retrieval index for filtering
//! consumed content. Both are synchronous, single-owner, in-memory
//! structures.

pub mod clock;
pub mod config;
pub mod cost;
pub mod error;
pub mod index;
pub mod session;
pub mod shelf;
pub mod tags;
pub mod testing;

pub use error::{Result, ShelfError};
pub use index::{IndexSummary, IndexedItem, RetrievalIndex, TagQuery};
pub use session::{ContextSession, CrossReference, SessionStatus};
pub use shelf::{ContextShelf, EntryId, ShelfEntry, ShelfSnapshot, TagMap, Tier};
pub use tags::{Kind, Relevance, Scope, Tag, Trust, Volatility};

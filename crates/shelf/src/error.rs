//! Error types for the context shelf

use thiserror::Error;

use crate::shelf::EntryId;

/// Main error type for shelf and index operations
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Not enough eviction-eligible content to make room for a store.
    /// `remaining` is free space plus the size of every evictable entry.
    ///
    /// This is the only hard failure in the core and is returned to the
    /// caller unmodified; recovering (compress then retry) is the caller's job.
    #[error("Capacity error: cannot store {required} tokens, only {remaining} reclaimable (free plus evictable)")]
    Capacity { required: usize, remaining: usize },

    /// No shelf entry with the given handle
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShelfError {
    /// True when this is a capacity exhaustion error
    pub fn is_capacity(&self) -> bool {
        matches!(self, ShelfError::Capacity { .. })
    }
}

/// Result type alias for shelf operations
pub type Result<T> = std::result::Result<T, ShelfError>;

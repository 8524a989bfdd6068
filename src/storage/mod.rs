//! Storage module for persisting scraped records
//!
//! Records are cached as one pretty-printed JSON file per game id. A cached
//! file doubles as the cache entry: its modification time decides whether it
//! is still fresh, and there is no separate metadata.

mod record_store;

pub use record_store::RecordStore;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

//! Formatter trait and output errors

use crate::record::GameRecord;
use thiserror::Error;

/// Errors that can occur while rendering a record
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Renders a record as text
pub trait Formatter {
    /// Formats a single record
    fn format(&self, record: &GameRecord) -> OutputResult<String>;
}

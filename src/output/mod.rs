//! Output module for rendering scraped records
//!
//! This module handles:
//! - Formatting records as JSON or CSV
//! - Summarizing which record files a run read or wrote

mod csv;
mod json;
mod summary;
mod traits;

pub use csv::{write_row, CsvFormatter};
pub use json::JsonFormatter;
pub use summary::RunSummary;
pub use traits::{Formatter, OutputError, OutputResult};

use crate::storage::RecordStore;

/// Output formats selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// Returns the formatter for this format
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            Self::Json => Box::new(JsonFormatter::default()),
            Self::Csv => Box::new(CsvFormatter),
        }
    }
}

/// Builds the run summary from a record store's bookkeeping
pub fn run_summary(store: &RecordStore) -> RunSummary {
    RunSummary {
        cached: store.cached_files().to_vec(),
        saved: store.saved_files().to_vec(),
    }
}

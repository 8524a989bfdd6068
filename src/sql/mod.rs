//! SQL generation from scraped records
//!
//! Each record file becomes one idempotent `DO $$ ... $$` block: an upsert
//! into `products` keyed on title, variant and group, followed by one
//! `product_prices` insert per known price.

mod batch;
mod classify;
mod insert;

pub use batch::{convert_files, expand_file_patterns, ConversionSummary, OUTPUT_HEADER};
pub use classify::{
    classify_product_type, infer_region, release_year, validate_rating, ProductType, Region,
    DEFAULT_PRODUCT_TYPE, DEFAULT_REGION, PRODUCT_GROUP,
};
pub use insert::generate_sql_block;

use thiserror::Error;

/// Errors raised while converting records to SQL
#[derive(Debug, Error)]
pub enum SqlError {
    #[error("Record {record} has no pricecharting_url")]
    MissingSourceUrl { record: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid record JSON in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for SQL generation
pub type SqlResult<T> = Result<T, SqlError>;

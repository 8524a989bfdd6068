//! PriceCharting scraper: a polite catalog scraper and SQL toolkit
//!
//! This crate fetches game listings from the PriceCharting catalog, caches them
//! as JSON records, turns those records into SQL for a product/price database,
//! and dumps that database through its remote procedure call API.

pub mod backup;
pub mod config;
pub mod fields;
pub mod images;
pub mod output;
pub mod record;
pub mod scraper;
pub mod sql;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Page for game {expected} failed validation")]
    PageMismatch { expected: u64 },

    #[error("Could not resolve a game id from '{input}': {reason}")]
    UnresolvedGameId { input: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{GameRecord, PriceCategory, VariantReference};
pub use crate::scraper::PriceChartingScraper;

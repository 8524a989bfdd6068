//! Configuration module for the scraper
//!
//! This module handles built-in defaults, optional TOML user files, explicit
//! command-line overrides, and validation of the merged result.
//!
//! Precedence is explicit value > user file > built-in default.
//!
//! # Example
//!
//! ```no_run
//! use pricecharting_scraper::config::{load_config, ConfigOverrides};
//! use std::path::Path;
//!
//! let config = load_config(Some(Path::new("config.toml")), &ConfigOverrides::default()).unwrap();
//! println!("Requests are spaced by at least {}s", config.rate_limit.delay);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConfigFile, ConfigOverrides, OutputConfig, OutputSection, RateLimitConfig,
    RateLimitSection, ScraperConfig, ScraperSection, MAX_DELAY_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, read_config_file};

//! Catalog scraper
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching of product pages
//! - Product page parsing and validation
//! - Request pacing with jitter
//! - Per-game coordination of cache, fetch, variants and persistence

mod coordinator;
mod fetcher;
mod parser;
mod rate_limiter;

pub use coordinator::PriceChartingScraper;
pub use fetcher::{build_http_client, classify_transport_error, fetch_text};
pub use parser::{
    parse_catalog_id, parse_game_record, parse_product_page, parse_variants, validate_page,
    ParsedProduct,
};
pub use rate_limiter::RateLimiter;

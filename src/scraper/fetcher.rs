//! HTTP fetching for catalog pages
//!
//! Builds the shared client and performs single GET requests. There are no
//! retries: a failed request becomes an error record upstream.

use crate::config::ScraperConfig;
use crate::{Result, ScrapeError};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ScraperConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Short description of a transport failure for logs
pub fn classify_transport_error(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "request timeout"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_decode() || error.is_body() {
        "failed to read body"
    } else {
        "request failed"
    }
}

/// Fetches a URL and returns its body as text
///
/// # Returns
///
/// * `Ok(String)` - The body of a 200 response
/// * `Err(ScrapeError::Status)` - Any other status code
/// * `Err(ScrapeError::Http)` - Transport error
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("GET {}", url);

    let response = client.get(url).send().await.map_err(|source| {
        tracing::debug!("{} for {}", classify_transport_error(&source), url);
        ScrapeError::Http {
            url: url.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })
}

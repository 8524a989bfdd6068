//! Product image downloading
//!
//! Images are fetched with the scraper's client, flattened onto a white
//! background when they carry transparency, and stored as WebP under a
//! sharded directory: `<image_dir>/<first 3 chars of id>/<id>.webp`.

mod batch;
mod downloader;

pub use batch::{fetch_image_list, parse_image_list, BatchSummary, ImageListEntry};
pub use downloader::{encode_webp, flatten_on_white, shard_path, ImageDownloader};

use thiserror::Error;

/// Image download and conversion failures
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode or encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for image operations
pub type ImageResult<T> = std::result::Result<T, ImageError>;

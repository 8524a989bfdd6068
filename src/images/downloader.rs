use super::{ImageError, ImageResult};
use image::{DynamicImage, RgbImage};
use reqwest::{Client, StatusCode};
use std::fs;
use std::path::{Path, PathBuf};

/// Lossy WebP quality used for every stored image
pub const WEBP_QUALITY: f32 = 90.0;

/// Location of an image inside the sharded image directory
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::images::shard_path;
/// use std::path::Path;
///
/// assert_eq!(
///     shard_path(Path::new("products"), "12345"),
///     Path::new("products/123/12345.webp")
/// );
/// ```
pub fn shard_path(image_dir: &Path, id: &str) -> PathBuf {
    let shard: String = id.chars().take(3).collect();
    image_dir.join(shard).join(format!("{}.webp", id))
}

/// Converts an image to RGB, compositing any alpha channel onto white
pub fn flatten_on_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Writes an RGB image as lossy WebP at [`WEBP_QUALITY`], creating parent
/// directories
pub fn encode_webp(image: &RgbImage, path: &Path) -> ImageResult<()> {
    let io_error = |source| ImageError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let encoded =
        webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height()).encode(WEBP_QUALITY);
    fs::write(path, &*encoded).map_err(io_error)?;
    Ok(())
}

/// Downloads product images into the sharded image directory
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: Client,
    image_dir: PathBuf,
}

impl ImageDownloader {
    /// Creates a downloader sharing the scraper's HTTP client
    pub fn new(client: Client, image_dir: &Path) -> Self {
        Self {
            client,
            image_dir: image_dir.to_path_buf(),
        }
    }

    /// Where the image for `id` is stored
    pub fn path_for(&self, id: &str) -> PathBuf {
        shard_path(&self.image_dir, id)
    }

    /// Returns true if the image for `id` is already on disk
    pub fn has_image(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Downloads, converts and stores one image
    ///
    /// Nothing is written unless the response is a 200 with a decodable
    /// image.
    pub async fn download(&self, url: &str, id: &str) -> ImageResult<PathBuf> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ImageError::Http {
                url: url.to_string(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(ImageError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| ImageError::Http {
            url: url.to_string(),
            source,
        })?;

        let decoded = image::load_from_memory(&bytes)?;
        let flattened = flatten_on_white(decoded);

        let path = self.path_for(id);
        encode_webp(&flattened, &path)?;
        Ok(path)
    }

    /// Downloads one image, logging the outcome instead of returning it
    ///
    /// # Returns
    ///
    /// `true` if the image was stored
    pub async fn download_logged(&self, url: &str, id: &str) -> bool {
        match self.download(url, id).await {
            Ok(path) => {
                tracing::info!("Saved image: {}", path.display());
                true
            }
            Err(e) => {
                tracing::error!("Failed to download image for game {}: {}", id, e);
                false
            }
        }
    }
}

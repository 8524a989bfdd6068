//! Batch image fetching from an `id;url` list

use super::ImageDownloader;
use std::path::Path;

/// One line of an image list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageListEntry {
    pub id: String,
    pub url: String,
}

/// Outcome counts of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Ids become path components, so only plain digits are accepted
fn is_game_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Parses `id;url` lines, skipping blank lines
///
/// Malformed lines, including ids that are not plain digits, are logged and
/// counted as skipped.
pub fn parse_image_list(content: &str) -> (Vec<ImageListEntry>, usize) {
    let mut entries = Vec::new();
    let mut skipped = 0;

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(';') {
            Some((id, url)) if is_game_id(id.trim()) && !url.trim().is_empty() => {
                entries.push(ImageListEntry {
                    id: id.trim().to_string(),
                    url: url.trim().to_string(),
                });
            }
            _ => {
                tracing::warn!("Skipping malformed line {}: {}", number + 1, line);
                skipped += 1;
            }
        }
    }

    (entries, skipped)
}

/// Downloads every image named in an `id;url` list file, one at a time
pub async fn fetch_image_list(
    downloader: &ImageDownloader,
    list_path: &Path,
) -> std::io::Result<BatchSummary> {
    let content = std::fs::read_to_string(list_path)?;
    let (entries, skipped) = parse_image_list(&content);
    tracing::info!(
        "Loaded {} image entries from {}",
        entries.len(),
        list_path.display()
    );

    let mut summary = BatchSummary {
        skipped,
        ..BatchSummary::default()
    };

    for entry in &entries {
        if downloader.download_logged(&entry.url, &entry.id).await {
            summary.saved += 1;
        } else {
            summary.failed += 1;
        }
    }

    Ok(summary)
}

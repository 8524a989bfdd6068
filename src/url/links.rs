//! Game link extraction from saved catalog pages

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Origin of the catalog site
pub const CATALOG_ORIGIN: &str = "https://www.pricecharting.com";

/// Path prefix of game pages
const GAME_PATH_PREFIX: &str = "/game/";

/// Returns true if an href points at a catalog game page
///
/// Accepts absolute links on the catalog origin and site-relative links.
pub fn is_game_link(href: &str) -> bool {
    href.starts_with(GAME_PATH_PREFIX)
        || href
            .strip_prefix(CATALOG_ORIGIN)
            .is_some_and(|rest| rest.starts_with(GAME_PATH_PREFIX))
}

/// Makes a site-relative game link absolute
fn absolutize(href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", CATALOG_ORIGIN, href)
    } else {
        href.to_string()
    }
}

/// Extracts game links from an HTML document
///
/// Site-relative links are made absolute, then duplicates are dropped,
/// keeping the first occurrence.
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::url::extract_game_links;
///
/// let html = r#"<a href="https://www.pricecharting.com/game/foo">A</a><a href="/game/foo">B</a>"#;
/// assert_eq!(extract_game_links(html), vec!["https://www.pricecharting.com/game/foo"]);
/// ```
pub fn extract_game_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let mut total = 0usize;
    for element in document.select(&selector) {
        total += 1;
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if !is_game_link(href) {
            continue;
        }

        let absolute = absolutize(href);
        if seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    tracing::debug!("Found {} links, {} unique game links", total, links.len());
    links
}

/// Reads an HTML file, extracts its game links and writes one per line
///
/// # Returns
///
/// The extracted links, in first-seen order
pub fn extract_links_to_file(html_path: &Path, output_path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(html_path)?;
    tracing::info!("Read {} bytes from {}", content.len(), html_path.display());

    let links = extract_game_links(&content);

    let mut file = std::fs::File::create(output_path)?;
    for link in &links {
        writeln!(file, "{}", link)?;
    }

    tracing::info!(
        "Wrote {} unique game links to {}",
        links.len(),
        output_path.display()
    );
    Ok(links)
}

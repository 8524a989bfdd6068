//! Product page parsing
//!
//! Turns a catalog product page into a [`GameRecord`]. All selectors target
//! the catalog's markup:
//! - `<script>` holding `VGPC.product = { id: ... }` identifies the page
//! - `h1.chart_title` holds the name (with a nested platform link)
//! - `div#full-prices` lists prices by condition
//! - `table#attribute` lists the detail fields
//! - the "Variants:" row links alternate listings

use crate::fields::{clean_price, lookup, propercase, split_variant_suffix, DetailField};
use crate::record::{GameRecord, PriceCategory, VariantReference};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static PRODUCT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id:\s*(\d+)").expect("valid product id pattern"));

/// Host suffix of the image CDN linked from product pages
const IMAGE_HOST_SUFFIX: &str = "googleapis.com";

/// Everything read from one product page
#[derive(Debug, Clone)]
pub struct ParsedProduct {
    pub record: GameRecord,
    pub variants: Vec<VariantReference>,
}

/// Parses a product page for the given game id
///
/// # Arguments
///
/// * `html` - The page body
/// * `game_id` - The id that was requested
///
/// # Returns
///
/// * `Some(ParsedProduct)` - The page belongs to `game_id`
/// * `None` - The page failed validation
pub fn parse_product_page(html: &str, game_id: u64) -> Option<ParsedProduct> {
    let document = Html::parse_document(html);

    if !validate_page(&document, game_id) {
        return None;
    }

    Some(ParsedProduct {
        record: parse_game_record(&document, game_id),
        variants: parse_variants(&document),
    })
}

/// Checks that the page's product script carries the expected id
pub fn validate_page(document: &Html, expected_id: u64) -> bool {
    let Ok(selector) = Selector::parse("script") else {
        return false;
    };

    document
        .select(&selector)
        .map(|script| script.text().collect::<String>())
        .filter(|source| source.contains("VGPC.product"))
        .any(|source| {
            PRODUCT_ID
                .captures(&source)
                .and_then(|caps| caps[1].parse::<u64>().ok())
                == Some(expected_id)
        })
}

/// Extracts every record field from a validated page
pub fn parse_game_record(document: &Html, game_id: u64) -> GameRecord {
    let mut record = GameRecord::new(game_id);

    record.pricecharting_url = parse_canonical_url(document);
    parse_product_name(document, &mut record);
    parse_prices(document, &mut record);
    record.image_url = parse_image_url(document);
    parse_details(document, &mut record);
    record.refresh_combined_name();

    record
}

fn parse_canonical_url(document: &Html) -> Option<String> {
    let selector = Selector::parse("link[rel='canonical'][href]").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Collects text below an element, skipping nested links
fn text_without_links(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if child_element.value().name() != "a" {
                text_without_links(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn parse_product_name(document: &Html, record: &mut GameRecord) {
    let Ok(selector) = Selector::parse("h1.chart_title") else {
        return;
    };
    let Some(title) = document.select(&selector).next() else {
        return;
    };

    let mut raw = String::new();
    text_without_links(title, &mut raw);
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let (base, variant) = split_variant_suffix(&name);
    record.product_name = Some(propercase(&base));
    if let Some(variant) = variant {
        record.variant_name = Some(propercase(&variant));
    }
}

fn parse_prices(document: &Html, record: &mut GameRecord) {
    let (Ok(rows), Ok(cell), Ok(price_cell)) = (
        Selector::parse("div#full-prices tr"),
        Selector::parse("td"),
        Selector::parse("td.price.js-price"),
    ) else {
        return;
    };

    for row in document.select(&rows) {
        let (Some(label), Some(price)) = (row.select(&cell).next(), row.select(&price_cell).next())
        else {
            continue;
        };

        let label = label.text().collect::<String>();
        if let Some(category) = PriceCategory::from_label(label.trim()) {
            let value = clean_price(&price.text().collect::<String>());
            record.prices.insert(category, value);
        }
    }
}

fn parse_image_url(document: &Html) -> Option<String> {
    let extra = Selector::parse("div.extra").ok()?;
    let links = Selector::parse("a[href]").ok()?;

    let container = document.select(&extra).next()?;
    container
        .select(&links)
        .filter_map(|link| link.value().attr("href"))
        .find(|href| {
            Url::parse(href)
                .ok()
                .and_then(|url| url.host_str().map(|h| h.ends_with(IMAGE_HOST_SUFFIX)))
                .unwrap_or(false)
        })
        .map(str::to_string)
}

fn parse_details(document: &Html, record: &mut GameRecord) {
    let (Ok(rows), Ok(title_cell), Ok(details_cell)) = (
        Selector::parse("table#attribute tr"),
        Selector::parse("td.title"),
        Selector::parse("td.details"),
    ) else {
        return;
    };

    let mut esrb = None;
    let mut pegi = None;

    for row in document.select(&rows) {
        let (Some(title), Some(details)) = (
            row.select(&title_cell).next(),
            row.select(&details_cell).next(),
        ) else {
            continue;
        };

        let label = title.text().collect::<String>();
        let Some(descriptor) = lookup(&label) else {
            continue;
        };

        let value = (descriptor.normalize)(&details.text().collect::<String>());
        match descriptor.field {
            DetailField::EsrbRating => esrb = value.into_text(),
            DetailField::PegiRating => pegi = value.into_text(),
            field => record.details.apply(field, value),
        }
    }

    record.details.resolve_rating(esrb, pegi);
}

/// Finds the cell that follows a label cell with the given text
fn labelled_cell<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse("td").ok()?;
    let label_cell = document
        .select(&selector)
        .find(|td| td.text().collect::<String>().trim() == label)?;

    label_cell
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "td")
}

/// Lists the variants linked from the "Variants:" row, in page order
pub fn parse_variants(document: &Html) -> Vec<VariantReference> {
    let Some(cell) = labelled_cell(document, "Variants:") else {
        return Vec::new();
    };
    let Ok(links) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    cell.select(&links)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            if !href.starts_with("/game/") {
                return None;
            }
            let id = href.rsplit('/').next()?.parse::<u64>().ok()?;
            let name = link.text().collect::<String>();
            Some(VariantReference {
                id,
                variant_name: propercase(name.trim()),
            })
        })
        .collect()
}

/// Reads the numeric id from the "PriceCharting ID:" row
pub fn parse_catalog_id(html: &str) -> Option<u64> {
    let document = Html::parse_document(html);
    let cell = labelled_cell(&document, "PriceCharting ID:")?;
    cell.text().collect::<String>().trim().parse().ok()
}

/// Values the catalog uses to mean "nothing here"
const EMPTY_VALUES: &[&str] = &["none", "-", "n/a"];

/// Placeholder price cells that mean "no price"
const EMPTY_PRICES: &[&str] = &["--", "N/A", ""];

/// Converts a price cell into a number
///
/// Currency symbols and thousands separators are stripped. Placeholders and
/// anything that does not parse yield `None`.
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::fields::clean_price;
///
/// assert_eq!(clean_price("$12.34"), Some(12.34));
/// assert_eq!(clean_price("12,345.00"), Some(12345.0));
/// assert_eq!(clean_price("--"), None);
/// ```
pub fn clean_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if EMPTY_PRICES.contains(&trimmed) {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_empty_value(value: &str) -> bool {
    let lowered = value.to_lowercase();
    value.is_empty() || EMPTY_VALUES.contains(&lowered.as_str())
}

/// Trims a free-text detail value; placeholders become `None`
pub fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_empty_value(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits a comma-separated identifier cell (EAN, UPC, ASIN, ePID)
///
/// Placeholders yield an empty list.
pub fn clean_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if is_empty_value(trimmed) {
        return Vec::new();
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

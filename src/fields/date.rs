use chrono::NaiveDate;

/// Strings the catalog uses for unknown release dates
const UNKNOWN_DATES: &[&str] = &["none", "tba", "n/a"];

/// Full-date layouts tried in order
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
];

/// Converts a loosely formatted date into `YYYY-MM-DD`
///
/// Month names may be full or abbreviated. Dates missing a day resolve to the
/// first of the month; a bare year resolves to January 1st.
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::fields::normalize_date;
///
/// assert_eq!(normalize_date("November 7, 2006").as_deref(), Some("2006-11-07"));
/// assert_eq!(normalize_date("TBA"), None);
/// ```
pub fn normalize_date(raw: &str) -> Option<String> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() || UNKNOWN_DATES.contains(&text.to_lowercase().as_str()) {
        return None;
    }

    parse_loose(&text).map(|date| date.format("%Y-%m-%d").to_string())
}

fn parse_loose(text: &str) -> Option<NaiveDate> {
    if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        let year = text.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    // "November 2006" / "Nov 2006"; must run before "%B %d %Y", which would
    // read the year as a day and a two-digit year
    if text.split(' ').count() == 2 {
        return NaiveDate::parse_from_str(&format!("1 {}", text), "%d %B %Y").ok();
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

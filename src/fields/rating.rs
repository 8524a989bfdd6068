use regex::Regex;
use std::sync::LazyLock;

static PEGI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PEGI\s*(\d+)").expect("valid PEGI pattern"));

/// ESRB full names, longest first so "EVERYONE 10+" wins over "EVERYONE"
const ESRB_NAMES: &[(&str, &str)] = &[
    ("EARLY CHILDHOOD", "EC"),
    ("EVERYONE 10+", "E10"),
    ("EVERYONE", "E"),
    ("TEEN", "T"),
    ("MATURE", "M"),
    ("ADULTS ONLY", "AO"),
    ("RATING PENDING", "RP"),
];

/// ESRB abbreviations as they appear as standalone tokens
const ESRB_TOKENS: &[(&str, &str)] = &[
    ("EC", "EC"),
    ("E10+", "E10"),
    ("E10", "E10"),
    ("E", "E"),
    ("T", "T"),
    ("M", "M"),
    ("AO", "AO"),
    ("RP", "RP"),
];

/// Standardizes a PEGI rating cell to `PEGI <n>`
pub fn standardize_pegi_rating(raw: &str) -> Option<String> {
    PEGI_PATTERN
        .captures(raw)
        .map(|caps| format!("PEGI {}", &caps[1]))
}

/// Standardizes an ESRB rating cell to `ESRB <ABBR>`
///
/// Full rating names are matched anywhere in the text; abbreviations only as
/// whole tokens, so "Teen" never reads as "E".
pub fn standardize_esrb_rating(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }

    if let Some((_, abbrev)) = ESRB_NAMES.iter().find(|(name, _)| upper.contains(name)) {
        return Some(format!("ESRB {}", abbrev));
    }

    upper
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '+'))
        .filter(|token| !token.is_empty() && *token != "ESRB")
        .find_map(|token| {
            ESRB_TOKENS
                .iter()
                .find(|(t, _)| *t == token)
                .map(|(_, abbrev)| format!("ESRB {}", abbrev))
        })
}

/// Words kept lowercase inside a title
const LOWERCASE_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "like", "near", "nor",
    "of", "on", "onto", "or", "over", "past", "so", "than", "the", "to", "up", "upon", "with", "yet",
];

/// Uppercases the first character and lowercases the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Converts text to title case the way the catalog titles are stored
///
/// The first word is always capitalized. Later words that already contain an
/// uppercase letter ("II", "HD") are kept verbatim, stop words are lowered
/// unless they open a subtitle after a colon, and everything else is
/// capitalized. Words are re-joined with single spaces.
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::fields::propercase;
///
/// assert_eq!(
///     propercase("legend of zelda: the wind waker HD"),
///     "Legend of Zelda: The Wind Waker HD"
/// );
/// ```
pub fn propercase(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return text.to_string();
    }

    let mut out: Vec<String> = Vec::with_capacity(words.len());
    out.push(capitalize(words[0]));

    for pair in words.windows(2) {
        let (previous, word) = (pair[0], pair[1]);

        if word.chars().any(char::is_uppercase) {
            out.push(word.to_string());
            continue;
        }

        let lower = word.to_lowercase();
        if LOWERCASE_WORDS.contains(&lower.as_str()) && !previous.ends_with(':') {
            out.push(lower);
        } else {
            out.push(capitalize(word));
        }
    }

    out.join(" ")
}

/// Splits `"Name [Variant]"` into its base name and bracketed variant
///
/// Returns the trimmed base name and the bracket contents, if a closing
/// bracket follows the first opening one.
pub fn split_variant_suffix(name: &str) -> (String, Option<String>) {
    match name.split_once('[') {
        Some((base, rest)) => {
            let variant = rest
                .split_once(']')
                .map(|(inner, _)| inner.trim().to_string());
            (base.trim().to_string(), variant)
        }
        None => (name.trim().to_string(), None),
    }
}

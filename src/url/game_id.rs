use regex::Regex;
use std::sync::LazyLock;

/// `/game/<console>/<slug>/<id>` style paths, id as the last numeric segment
static GAME_PATH_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/game/(?:[^/]+/)*(\d+)(?:/[^/]*)?$").expect("valid game path pattern")
});

/// Builds the per-id game page URL under a catalog root
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::url::game_url;
///
/// assert_eq!(game_url("https://www.pricecharting.com/", 123), "https://www.pricecharting.com/game/123");
/// ```
pub fn game_url(base_url: &str, id: u64) -> String {
    format!("{}/game/{}", base_url.trim_end_matches('/'), id)
}

/// Extracts a game id from a numeric id or a catalog URL containing one
///
/// Returns `None` when the id can only be found by fetching the page (slug
/// URLs such as `/game/pal-xbox-360/kinect-sports`).
pub fn parse_game_id(input: &str) -> Option<u64> {
    let input = input.trim();

    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return input.parse().ok();
    }

    GAME_PATH_ID
        .captures(input)
        .and_then(|caps| caps[1].parse().ok())
}

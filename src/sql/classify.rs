//! Product classification tables
//!
//! Each classifier walks an ordered `(pattern, result)` table and falls back
//! to a documented default when nothing matches.

/// Platform tag stored in `product_group`
pub const PRODUCT_GROUP: &str = "Xbox 360";

/// Release region of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Pal,
    NtscJ,
    Ntsc,
}

impl Region {
    /// Database name of the region
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pal => "PAL",
            Self::NtscJ => "NTSC-J",
            Self::Ntsc => "NTSC",
        }
    }

    /// Rating systems valid in this region, as rating prefixes
    pub fn rating_prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Ntsc => &["ESRB"],
            Self::NtscJ => &["CERO"],
            Self::Pal => &["PEGI", "USK", "BBFC", "ACB"],
        }
    }
}

/// Region for URLs that match no pattern (and for records without a URL)
pub const DEFAULT_REGION: Region = Region::Pal;

/// URL path markers in precedence order; `/xbox-360` is contained in the
/// others and must come last
const REGION_PATTERNS: &[(&str, Region)] = &[
    ("/pal-xbox-360", Region::Pal),
    ("/jp-xbox-360", Region::NtscJ),
    ("/xbox-360", Region::Ntsc),
];

/// Kind of product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    Game,
    Peripheral,
    Console,
}

impl ProductType {
    /// Database name of the product type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "Game",
            Self::Peripheral => "Peripheral",
            Self::Console => "Console",
        }
    }

    /// Hardware carries neither variant nor genre
    pub fn clears_extras(&self) -> bool {
        !matches!(self, Self::Game)
    }
}

/// Product type for titles that match no marker
pub const DEFAULT_PRODUCT_TYPE: ProductType = ProductType::Game;

/// Title markers in precedence order, matched case-insensitively
const PRODUCT_TYPE_MARKERS: &[(&str, ProductType)] = &[
    (" controller", ProductType::Peripheral),
    (" console", ProductType::Console),
];

/// Infers the release region from the canonical URL
///
/// # Examples
///
/// ```
/// use pricecharting_scraper::sql::{infer_region, Region};
///
/// assert_eq!(infer_region(Some("https://www.pricecharting.com/game/jp-xbox-360/x")), Region::NtscJ);
/// assert_eq!(infer_region(None), Region::Pal);
/// ```
pub fn infer_region(url: Option<&str>) -> Region {
    let Some(url) = url else {
        return DEFAULT_REGION;
    };

    REGION_PATTERNS
        .iter()
        .find(|(pattern, _)| url.contains(pattern))
        .map(|(_, region)| *region)
        .unwrap_or(DEFAULT_REGION)
}

/// Keeps a rating only when its rating system is used in the region
pub fn validate_rating(region: Region, rating: Option<&str>) -> Option<String> {
    let rating = rating?;
    region
        .rating_prefixes()
        .iter()
        .any(|prefix| rating.starts_with(prefix))
        .then(|| rating.to_string())
}

/// Classifies a product by the markers in its title
pub fn classify_product_type(title: &str) -> ProductType {
    let title = title.to_lowercase();
    PRODUCT_TYPE_MARKERS
        .iter()
        .find(|(marker, _)| title.contains(marker))
        .map(|(_, product_type)| *product_type)
        .unwrap_or(DEFAULT_PRODUCT_TYPE)
}

/// Oldest release year accepted
const MIN_RELEASE_YEAR: u16 = 2000;

/// Newest release year accepted
const MAX_RELEASE_YEAR: u16 = 2024;

/// Extracts the release year from a `YYYY-MM-DD` date
///
/// Years outside 2000..=2024 and unparsable dates give 0.
pub fn release_year(date: Option<&str>) -> u16 {
    date.and_then(|d| d.split('-').next())
        .and_then(|year| year.trim().parse::<u16>().ok())
        .filter(|year| (MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(year))
        .unwrap_or(0)
}

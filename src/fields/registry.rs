//! The detail field registry
//!
//! Maps labels from the product's attribute table to record fields. The
//! table is an ordered slice so lookups and extraction order never depend on
//! map iteration order. Several labels may feed the same field ("ASIN" and
//! "ASIN (Amazon)").

use crate::fields::{clean_list, clean_text, normalize_date};
use crate::fields::{standardize_esrb_rating, standardize_pegi_rating};
use crate::record::GameDetails;

/// A record field fed by the attribute table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Genre,
    ReleaseDate,
    Publisher,
    Developer,
    EanGtin,
    Upc,
    Asin,
    Epid,
    PegiRating,
    EsrbRating,
}

impl DetailField {
    /// Name of the field in record files
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::ReleaseDate => "release_date",
            Self::Publisher => "publisher",
            Self::Developer => "developer",
            Self::EanGtin => "ean_gtin",
            Self::Upc => "upc",
            Self::Asin => "asin",
            Self::Epid => "epid",
            Self::PegiRating | Self::EsrbRating => "rating",
        }
    }

    /// Returns true for the two rating sources, which are resolved together
    pub fn is_rating(&self) -> bool {
        matches!(self, Self::PegiRating | Self::EsrbRating)
    }
}

/// A normalized detail value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailValue {
    Text(Option<String>),
    List(Vec<String>),
}

impl DetailValue {
    /// The text value, if this is a text field
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(value) => value,
            Self::List(_) => None,
        }
    }
}

/// One entry of the registry: page label, target field, normalizer
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub label: &'static str,
    pub field: DetailField,
    pub normalize: fn(&str) -> DetailValue,
}

fn text(raw: &str) -> DetailValue {
    DetailValue::Text(clean_text(raw))
}

fn date(raw: &str) -> DetailValue {
    DetailValue::Text(clean_text(raw).and_then(|v| normalize_date(&v)))
}

fn list(raw: &str) -> DetailValue {
    DetailValue::List(clean_list(raw))
}

fn pegi(raw: &str) -> DetailValue {
    DetailValue::Text(standardize_pegi_rating(raw))
}

fn esrb(raw: &str) -> DetailValue {
    DetailValue::Text(standardize_esrb_rating(raw))
}

/// The registry, in extraction order
pub const DETAIL_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor { label: "Genre", field: DetailField::Genre, normalize: text },
    FieldDescriptor { label: "Release Date", field: DetailField::ReleaseDate, normalize: date },
    FieldDescriptor { label: "Publisher", field: DetailField::Publisher, normalize: text },
    FieldDescriptor { label: "Developer", field: DetailField::Developer, normalize: text },
    FieldDescriptor { label: "EAN / GTIN", field: DetailField::EanGtin, normalize: list },
    FieldDescriptor { label: "UPC", field: DetailField::Upc, normalize: list },
    FieldDescriptor { label: "ASIN", field: DetailField::Asin, normalize: list },
    FieldDescriptor { label: "ASIN (Amazon)", field: DetailField::Asin, normalize: list },
    FieldDescriptor { label: "ePID", field: DetailField::Epid, normalize: list },
    FieldDescriptor { label: "ePID (eBay)", field: DetailField::Epid, normalize: list },
    FieldDescriptor { label: "PEGI Rating", field: DetailField::PegiRating, normalize: pegi },
    FieldDescriptor { label: "ESRB Rating", field: DetailField::EsrbRating, normalize: esrb },
];

/// Finds the descriptor for a table label (trailing colon and whitespace ignored)
pub fn lookup(label: &str) -> Option<&'static FieldDescriptor> {
    let label = label.trim().trim_end_matches(':').trim_end();
    DETAIL_FIELDS.iter().find(|d| d.label == label)
}

impl GameDetails {
    /// Stores a normalized non-rating value in its field
    ///
    /// Rating fields are ignored here; see [`GameDetails::resolve_rating`].
    pub fn apply(&mut self, field: DetailField, value: DetailValue) {
        match (field, value) {
            (DetailField::Genre, DetailValue::Text(v)) => self.genre = v,
            (DetailField::ReleaseDate, DetailValue::Text(v)) => self.release_date = v,
            (DetailField::Publisher, DetailValue::Text(v)) => self.publisher = v,
            (DetailField::Developer, DetailValue::Text(v)) => self.developer = v,
            (DetailField::EanGtin, DetailValue::List(v)) => self.ean_gtin = Some(v),
            (DetailField::Upc, DetailValue::List(v)) => self.upc = Some(v),
            (DetailField::Asin, DetailValue::List(v)) => self.asin = Some(v),
            (DetailField::Epid, DetailValue::List(v)) => self.epid = Some(v),
            _ => {}
        }
    }

    /// Sets the rating, with ESRB taking priority over PEGI
    pub fn resolve_rating(&mut self, esrb: Option<String>, pegi: Option<String>) {
        self.rating = esrb.or(pegi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_strips_colon() {
        let descriptor = lookup("Release Date:").unwrap();
        assert_eq!(descriptor.field, DetailField::ReleaseDate);
        assert!(lookup("Players:").is_none());
    }

    #[test]
    fn test_aliases_share_field() {
        assert_eq!(lookup("ASIN").unwrap().field, lookup("ASIN (Amazon)").unwrap().field);
        assert_eq!(lookup("ePID").unwrap().field.field_name(), "epid");
    }

    #[test]
    fn test_normalizers() {
        let date = lookup("Release Date").unwrap();
        assert_eq!(
            (date.normalize)("November 7, 2006"),
            DetailValue::Text(Some("2006-11-07".to_string()))
        );

        let upc = lookup("UPC").unwrap();
        assert_eq!(
            (upc.normalize)("none"),
            DetailValue::List(Vec::new())
        );

        let esrb = lookup("ESRB Rating").unwrap();
        assert!(esrb.field.is_rating());
        assert_eq!((esrb.normalize)("Mature"), DetailValue::Text(Some("ESRB M".to_string())));
    }

    #[test]
    fn test_apply_and_rating_priority() {
        let mut details = GameDetails::default();
        details.apply(DetailField::Genre, DetailValue::Text(Some("FPS".to_string())));
        details.apply(DetailField::Upc, DetailValue::List(vec!["123".to_string()]));
        details.resolve_rating(Some("ESRB M".to_string()), Some("PEGI 16".to_string()));

        assert_eq!(details.genre.as_deref(), Some("FPS"));
        assert_eq!(details.upc, Some(vec!["123".to_string()]));
        assert_eq!(details.rating.as_deref(), Some("ESRB M"));

        details.resolve_rating(None, Some("PEGI 16".to_string()));
        assert_eq!(details.rating.as_deref(), Some("PEGI 16"));
    }

    #[test]
    fn test_registry_order_is_stable() {
        let labels: Vec<_> = DETAIL_FIELDS.iter().map(|d| d.label).collect();
        assert_eq!(labels.first(), Some(&"Genre"));
        assert_eq!(labels.last(), Some(&"ESRB Rating"));
    }
}

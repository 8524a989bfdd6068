//! Game records as scraped from the catalog and persisted to disk
//!
//! A [`GameRecord`] is built fresh for every fetch attempt. Successful records
//! carry every price category (with `null` for prices missing on the page);
//! error records carry `success = false` and empty price/detail maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed set of price conditions listed in the catalog's price table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    Loose,
    ItemBox,
    ItemManual,
    Complete,
    New,
    GradedCib,
    GradedNew,
    BoxOnly,
    ManualOnly,
}

impl PriceCategory {
    /// All categories in table order
    pub const ALL: [PriceCategory; 9] = [
        Self::Loose,
        Self::ItemBox,
        Self::ItemManual,
        Self::Complete,
        Self::New,
        Self::GradedCib,
        Self::GradedNew,
        Self::BoxOnly,
        Self::ManualOnly,
    ];

    /// Matches the label shown in the first column of the price table
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Loose" => Some(Self::Loose),
            "Item & Box" => Some(Self::ItemBox),
            "Item & Manual" => Some(Self::ItemManual),
            "Complete" => Some(Self::Complete),
            "New" => Some(Self::New),
            "Graded CIB" => Some(Self::GradedCib),
            "Graded New" => Some(Self::GradedNew),
            "Box Only" => Some(Self::BoxOnly),
            "Manual Only" => Some(Self::ManualOnly),
            _ => None,
        }
    }

    /// The normalized key used in record files and SQL output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::ItemBox => "item_box",
            Self::ItemManual => "item_manual",
            Self::Complete => "complete",
            Self::New => "new",
            Self::GradedCib => "graded_cib",
            Self::GradedNew => "graded_new",
            Self::BoxOnly => "box_only",
            Self::ManualOnly => "manual_only",
        }
    }
}

/// Structured attributes from the product's attribute table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ean_gtin: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub epid: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl GameDetails {
    /// Returns (field name, rendered value) pairs for every populated field
    pub fn populated(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let texts = [
            ("genre", &self.genre),
            ("release_date", &self.release_date),
            ("publisher", &self.publisher),
            ("developer", &self.developer),
        ];
        for (name, value) in texts {
            if let Some(v) = value {
                out.push((name, v.clone()));
            }
        }
        let lists = [
            ("ean_gtin", &self.ean_gtin),
            ("upc", &self.upc),
            ("asin", &self.asin),
            ("epid", &self.epid),
        ];
        for (name, value) in lists {
            if let Some(v) = value {
                out.push((name, v.join(", ")));
            }
        }
        if let Some(rating) = &self.rating {
            out.push(("rating", rating.clone()));
        }
        out
    }
}

/// A single scraped catalog listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    pub success: bool,

    pub id: Option<u64>,

    pub pricecharting_url: Option<String>,

    pub product_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_name: Option<String>,

    pub image_url: Option<String>,

    pub prices: BTreeMap<PriceCategory, Option<f64>>,

    pub details: GameDetails,
}

impl GameRecord {
    /// Creates a successful record with every price category unset
    pub fn new(id: u64) -> Self {
        Self {
            success: true,
            id: Some(id),
            prices: PriceCategory::ALL.iter().map(|c| (*c, None)).collect(),
            ..Self::default()
        }
    }

    /// Creates the record persisted when a fetch or page validation fails
    pub fn error(id: u64) -> Self {
        Self {
            success: false,
            id: Some(id),
            ..Self::default()
        }
    }

    /// Tags this record as a variant and derives its combined display name
    pub fn set_variant(&mut self, variant_name: &str) {
        self.variant_name = Some(variant_name.to_string());
        self.refresh_combined_name();
    }

    /// Recomputes `combined_name` from product and variant names
    pub fn refresh_combined_name(&mut self) {
        self.combined_name = match (&self.product_name, &self.variant_name) {
            (Some(product), Some(variant)) if !product.is_empty() && !variant.is_empty() => {
                Some(format!("{} ({})", product, variant))
            }
            _ => None,
        };
    }
}

/// A variant listing discovered on a parent product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantReference {
    pub id: u64,
    pub variant_name: String,
}

//! Field normalization for scraped catalog values
//!
//! This module turns loosely formatted page text into the normalized values
//! stored on a [`GameRecord`](crate::record::GameRecord):
//! - Price strings into numbers
//! - Release dates into `YYYY-MM-DD`
//! - Titles into proper case
//! - Region-specific age ratings into a canonical form
//! - Detail table labels into record fields (the detail field registry)

mod date;
mod rating;
mod registry;
mod title;
mod validators;

pub use date::normalize_date;
pub use rating::{standardize_esrb_rating, standardize_pegi_rating};
pub use registry::{lookup, DetailField, DetailValue, FieldDescriptor, DETAIL_FIELDS};
pub use title::{propercase, split_variant_suffix};
pub use validators::{clean_list, clean_price, clean_text};

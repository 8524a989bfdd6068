//! Catalog URL handling
//!
//! This module provides game URL construction, game id extraction from
//! command-line input, and extraction of game links from saved HTML pages.

mod game_id;
mod links;

pub use game_id::{game_url, parse_game_id};
pub use links::{extract_game_links, extract_links_to_file, is_game_link, CATALOG_ORIGIN};

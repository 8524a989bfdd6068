//! Integration tests
//!
//! These tests use wiremock to stand in for the catalog site and the
//! database API, and tempfile for record, image and dump directories.

mod backup_tests;
mod scrape_tests;
mod sql_tests;

//! End-of-run summary of cached and saved record files

use std::fmt::Write;
use std::path::PathBuf;

/// Record files touched during a scrape run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files served from the cache
    pub cached: Vec<PathBuf>,

    /// Files written by this run
    pub saved: Vec<PathBuf>,
}

impl RunSummary {
    /// Renders the summary; empty sections are omitted
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (title, files) in [("Cached", &self.cached), ("Saved", &self.saved)] {
            if files.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{}:", title);
            for file in files {
                let _ = writeln!(out, "- {}", file.display());
            }
        }
        out
    }
}

//! Id-keyed JSON record cache

use crate::record::GameRecord;
use crate::storage::{StoreError, StoreResult};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Directory of `<id>.json` record files with a freshness window
///
/// Besides reading and writing, the store remembers which files were served
/// from cache and which were written during this run, for the end-of-run
/// summary.
#[derive(Debug)]
pub struct RecordStore {
    dir: PathBuf,
    max_age: Duration,
    saved: Vec<PathBuf>,
    cached: Vec<PathBuf>,
}

impl RecordStore {
    /// Opens (and creates if needed) a record directory
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding the record files
    /// * `max_age` - Records older than this are stale
    pub fn new(dir: &Path, max_age: Duration) -> StoreResult<Self> {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            max_age,
            saved: Vec::new(),
            cached: Vec::new(),
        })
    }

    /// Path of the record file for a game id
    pub fn path_for(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Loads a cached record if it exists and is within the freshness window
    ///
    /// Missing or stale files are a cache miss. A file that cannot be read or
    /// parsed is also a cache miss, reported as a warning.
    pub fn load_fresh(&mut self, id: u64) -> Option<GameRecord> {
        let path = self.path_for(id);

        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age > self.max_age {
            tracing::debug!("Cached record for game {} is stale ({:?} old)", id, age);
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Error reading existing file for game {}: {}", id, e);
                return None;
            }
        };

        match serde_json::from_str::<GameRecord>(&content) {
            Ok(record) => {
                self.cached.push(path);
                Some(record)
            }
            Err(e) => {
                tracing::warn!("Error parsing existing file for game {}: {}", id, e);
                None
            }
        }
    }

    /// Writes a record, replacing any previous file for the same id
    pub fn save(&mut self, id: u64, record: &GameRecord) -> StoreResult<PathBuf> {
        let path = self.path_for(id);
        let json = serde_json::to_string_pretty(record)?;

        std::fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!("Saved game data to {}", path.display());
        self.saved.push(path.clone());
        Ok(path)
    }

    /// Files written during this run
    pub fn saved_files(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Files served from cache during this run
    pub fn cached_files(&self) -> &[PathBuf] {
        &self.cached
    }

    /// The record directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

//! Database backup through the remote procedure call API
//!
//! The database is introspected with a fixed set of remote functions
//! (tables, columns, functions, indexes, triggers, views) plus a full select
//! of every public table. The collected [`DatabaseSnapshot`] is rendered as
//! one executable SQL script wrapped in a single transaction. A previous dump
//! at the output path is copied into the dumps directory first.

mod postgrest;
mod render;
mod snapshot;
mod source;

pub use postgrest::{PostgrestClient, ANON_KEY_VAR, URL_VAR};
pub use render::{create_table_sql, format_column_value, format_sql_value, render_dump};
pub use snapshot::{collect_snapshot, DatabaseSnapshot, TableData, TableSchema};
pub use source::{
    ColumnInfo, FunctionDefinition, IndexDefinition, Row, SchemaSource, TableInfo,
    TriggerDefinition, ViewDefinition,
};

use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a backup
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Missing environment variable {0}")]
    MissingCredential(&'static str),

    #[error("Failed to load environment file {path}: {source}")]
    EnvFile {
        path: String,
        source: dotenvy::Error,
    },

    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error("Table error for {table}: {reason}")]
    TableSchema { table: String, reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

/// Where a backup run wrote its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    /// The new dump
    pub output: PathBuf,

    /// Timestamped copy of the previous dump, if there was one
    pub previous: Option<PathBuf>,

    /// Number of tables dumped
    pub tables: usize,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BackupError + '_ {
    move |source| BackupError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Copies an existing dump to `<dumps_dir>/<stem>.<YYYYmmdd_HHMMSS>.sql`
///
/// # Returns
///
/// * `Ok(Some(path))` - The copy that was made
/// * `Ok(None)` - There was no previous dump
pub fn preserve_previous_dump(
    output: &Path,
    dumps_dir: &Path,
    now: NaiveDateTime,
) -> BackupResult<Option<PathBuf>> {
    std::fs::create_dir_all(dumps_dir).map_err(io_error(dumps_dir))?;

    if !output.is_file() {
        return Ok(None);
    }

    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("db");
    let copy = dumps_dir.join(format!("{}.{}.sql", stem, now.format("%Y%m%d_%H%M%S")));
    std::fs::copy(output, &copy).map_err(io_error(&copy))?;

    tracing::info!("Previous backup copied to: {}", copy.display());
    Ok(Some(copy))
}

/// Runs a complete backup against a schema source
///
/// Nothing is written unless the whole snapshot could be collected.
pub async fn run_backup(
    source: &dyn SchemaSource,
    output: &Path,
    dumps_dir: &Path,
) -> BackupResult<BackupReport> {
    let snapshot = collect_snapshot(source).await?;

    let now = Local::now().naive_local();
    let previous = preserve_previous_dump(output, dumps_dir, now)?;

    let script = render_dump(&snapshot, now);
    std::fs::write(output, script).map_err(io_error(output))?;
    tracing::info!("Backup created: {}", output.display());

    Ok(BackupReport {
        output: output.to_path_buf(),
        previous,
        tables: snapshot.tables.len(),
    })
}

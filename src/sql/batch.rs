//! Conversion of record files into one SQL script

use crate::record::GameRecord;
use crate::sql::{generate_sql_block, SqlError, SqlResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// First line of every generated script
pub const OUTPUT_HEADER: &str = "-- Generated SQL inserts";

/// Expands shell-style patterns (`json/*.json`) in file arguments
///
/// Arguments without `*`, `?` or `[` are kept as given. Matches are sorted;
/// a pattern that matches nothing, or does not parse, is kept literally so
/// the conversion reports it as missing.
pub fn expand_file_patterns(args: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for arg in args {
        if !arg.contains(['*', '?', '[']) {
            files.push(PathBuf::from(arg));
            continue;
        }

        match glob::glob(arg) {
            Ok(paths) => {
                let mut matched: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
                if matched.is_empty() {
                    tracing::warn!("Pattern '{}' matched no files", arg);
                    files.push(PathBuf::from(arg));
                } else {
                    matched.sort();
                    files.extend(matched);
                }
            }
            Err(e) => {
                tracing::warn!("Invalid pattern '{}': {}", arg, e);
                files.push(PathBuf::from(arg));
            }
        }
    }

    files
}

/// Outcome of a conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Files whose block was written
    pub converted: Vec<PathBuf>,

    /// Files skipped because of an error
    pub failed: Vec<PathBuf>,
}

fn convert_file(path: &Path, ignore_existing: bool) -> SqlResult<String> {
    let content = std::fs::read_to_string(path).map_err(|source| SqlError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let record: GameRecord = serde_json::from_str(&content).map_err(|source| SqlError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    generate_sql_block(&record, ignore_existing)
}

/// Converts record files into an SQL script
///
/// The output file is recreated with [`OUTPUT_HEADER`]; every converted file
/// adds a `-- Processing <file>` line followed by its block. Files that fail
/// are logged and skipped.
///
/// # Returns
///
/// * `Ok(ConversionSummary)` - Which files were converted or skipped
/// * `Err(SqlError::Io)` - The output file could not be written
pub fn convert_files(
    files: &[PathBuf],
    output: &Path,
    ignore_existing: bool,
) -> SqlResult<ConversionSummary> {
    let mut writer = BufWriter::new(File::create(output)?);
    writeln!(writer, "{}\n", OUTPUT_HEADER)?;

    let mut summary = ConversionSummary::default();

    for path in files {
        if !path.is_file() {
            tracing::warn!("File '{}' not found", path.display());
            summary.failed.push(path.clone());
            continue;
        }

        tracing::info!("Processing {}...", path.display());
        match convert_file(path, ignore_existing) {
            Ok(block) => {
                writeln!(writer, "-- Processing {}", path.display())?;
                writer.write_all(block.as_bytes())?;
                summary.converted.push(path.clone());
            }
            Err(e) => {
                tracing::error!("Error processing {}: {}", path.display(), e);
                summary.failed.push(path.clone());
            }
        }
    }

    writer.flush()?;
    Ok(summary)
}

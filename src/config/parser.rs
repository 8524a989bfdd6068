use crate::config::types::{Config, ConfigFile, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads and parses a user configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(ConfigFile)` - The parsed file; absent keys are `None`
/// * `Err(ConfigError)` - The file could not be read or is not valid TOML
pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;
    Ok(file)
}

/// Builds the effective configuration
///
/// Starts from the built-in defaults, overlays the user file when one is
/// given, applies explicit overrides, then validates the result. A user file
/// that cannot be read or parsed is reported as a warning and skipped, so the
/// scraper still runs on defaults.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML user file
/// * `overrides` - Values given explicitly on the command line
///
/// # Returns
///
/// * `Ok(Config)` - Merged and validated configuration
/// * `Err(ConfigError)` - The merged configuration failed validation
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(path) = path {
        match read_config_file(path) {
            Ok(file) => {
                config.merge_file(file);
                if let Ok(hash) = compute_config_hash(path) {
                    tracing::info!("Loaded user config {} (hash: {})", path.display(), hash);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Could not load user config file {}: {}; using defaults",
                    path.display(),
                    e
                );
            }
        }
    }

    config.apply_overrides(overrides);
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged on load so runs can be matched to the settings they used.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

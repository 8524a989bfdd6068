use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default catalog host
pub const DEFAULT_BASE_URL: &str = "https://www.pricecharting.com";

/// Default browser-like user agent
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upper bound for every delay and jitter setting (seconds)
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub rate_limit: RateLimitConfig,
    pub output: OutputConfig,
}

/// HTTP behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Catalog root; game pages live under `<base_url>/game/<id>`
    pub base_url: String,
}

/// Request pacing
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Minimum seconds between requests
    pub delay: f64,

    /// Minimum seconds before a variant request
    pub variant_delay: f64,

    /// Lower bound of the random jitter added to every wait (seconds)
    pub jitter_min: f64,

    /// Upper bound of the random jitter (seconds, exclusive)
    pub jitter_max: f64,
}

/// Where results land
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    /// Maximum age of a cached record, in seconds
    pub file_age: u64,

    /// Directory of `<id>.json` record files
    pub json_dir: PathBuf,

    /// Root of the sharded image directory
    pub image_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig {
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout: 10,
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            rate_limit: RateLimitConfig {
                delay: 1.0,
                variant_delay: 3.0,
                jitter_min: 2.0,
                jitter_max: 4.0,
            },
            output: OutputConfig {
                file_age: 86_400,
                json_dir: PathBuf::from("./json"),
                image_dir: PathBuf::from("./products"),
            },
        }
    }
}

impl Config {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.timeout)
    }

    /// Freshness window of cached records
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.output.file_age)
    }

    /// Overlays a parsed user file onto this configuration
    pub fn merge_file(&mut self, file: ConfigFile) {
        let ConfigFile {
            scraper,
            rate_limit,
            output,
        } = file;

        set(&mut self.scraper.user_agent, scraper.user_agent);
        set(&mut self.scraper.timeout, scraper.timeout);
        set(&mut self.scraper.base_url, scraper.base_url);

        set(&mut self.rate_limit.delay, rate_limit.delay);
        set(&mut self.rate_limit.variant_delay, rate_limit.variant_delay);
        set(&mut self.rate_limit.jitter_min, rate_limit.jitter_min);
        set(&mut self.rate_limit.jitter_max, rate_limit.jitter_max);

        set(&mut self.output.file_age, output.file_age);
        set(&mut self.output.json_dir, output.json_dir);
        set(&mut self.output.image_dir, output.image_dir);
    }

    /// Applies explicit overrides, which beat both file and defaults
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        set(&mut self.scraper.user_agent, overrides.user_agent.clone());
        set(&mut self.scraper.timeout, overrides.timeout);
        set(&mut self.rate_limit.delay, overrides.delay);
        set(&mut self.rate_limit.variant_delay, overrides.variant_delay);
        set(&mut self.output.file_age, overrides.file_age);
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// A user configuration file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub scraper: ScraperSection,
    pub rate_limit: RateLimitSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScraperSection {
    pub user_agent: Option<String>,
    pub timeout: Option<u64>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateLimitSection {
    pub delay: Option<f64>,
    pub variant_delay: Option<f64>,
    pub jitter_min: Option<f64>,
    pub jitter_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub file_age: Option<u64>,
    pub json_dir: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub user_agent: Option<String>,
    pub timeout: Option<u64>,
    pub delay: Option<f64>,
    pub variant_delay: Option<f64>,
    pub file_age: Option<u64>,
}

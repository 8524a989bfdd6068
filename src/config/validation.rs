use crate::config::types::{Config, OutputConfig, RateLimitConfig, ScraperConfig, MAX_DELAY_SECS};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_rate_limit_config(&config.rate_limit)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout == 0 {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates request pacing
fn validate_rate_limit_config(config: &RateLimitConfig) -> Result<(), ConfigError> {
    let delays = [
        ("delay", config.delay),
        ("variant_delay", config.variant_delay),
        ("jitter_min", config.jitter_min),
        ("jitter_max", config.jitter_max),
    ];

    for (name, value) in delays {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative number of seconds, got {}",
                name, value
            )));
        }
        if value > MAX_DELAY_SECS {
            return Err(ConfigError::Validation(format!(
                "{} cannot exceed {} seconds, got {}",
                name, MAX_DELAY_SECS, value
            )));
        }
    }

    if config.jitter_min > config.jitter_max {
        return Err(ConfigError::Validation(format!(
            "jitter_min ({}) cannot exceed jitter_max ({})",
            config.jitter_min, config.jitter_max
        )));
    }

    Ok(())
}

/// Validates output locations
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.json_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "json_dir cannot be empty".to_string(),
        ));
    }

    if config.image_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "image_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

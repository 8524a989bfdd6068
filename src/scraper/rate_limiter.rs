//! Request pacing
//!
//! The limiter is owned by a scraper instance. Each call to
//! [`RateLimiter::wait`] draws a fresh jitter and sleeps until the spacing
//! since the previous request has elapsed. Uses tokio's clock so tests can
//! pause time.

use crate::config::{RateLimitConfig, MAX_DELAY_SECS};
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

/// Minimum spacing between outbound requests with random jitter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: f64,
    variant_delay: f64,
    jitter_min: f64,
    jitter_max: f64,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter that has not yet seen a request
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            delay: config.delay,
            variant_delay: config.variant_delay,
            jitter_min: config.jitter_min,
            jitter_max: config.jitter_max,
            last_request: None,
        }
    }

    /// Computes the spacing required before the next request
    ///
    /// # Arguments
    ///
    /// * `is_variant` - Whether the next request fetches a variant page
    /// * `jitter` - Extra seconds added on top of the base delay
    ///
    /// The result is capped at twice [`MAX_DELAY_SECS`]. A negative or NaN
    /// sum yields zero.
    pub fn spacing(&self, is_variant: bool, jitter: f64) -> Duration {
        let base = if is_variant {
            self.variant_delay
        } else {
            self.delay
        };
        let seconds = (base + jitter).min(2.0 * MAX_DELAY_SECS);
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
    }

    /// Draws a jitter from `[jitter_min, jitter_max)`
    fn sample_jitter(&self) -> f64 {
        if self.jitter_max > self.jitter_min {
            rand::thread_rng().gen_range(self.jitter_min..self.jitter_max)
        } else {
            self.jitter_min
        }
    }

    /// Sleeps until the next request may be sent, then records it
    ///
    /// The first call returns immediately.
    pub async fn wait(&mut self, is_variant: bool) {
        let spacing = self.spacing(is_variant, self.sample_jitter());

        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < spacing {
                let remaining = spacing - elapsed;
                tracing::debug!(
                    "Rate limiting: sleeping {:.2}s before {} request",
                    remaining.as_secs_f64(),
                    if is_variant { "variant" } else { "game" }
                );
                tokio::time::sleep(remaining).await;
            }
        }

        self.last_request = Some(Instant::now());
    }

    /// Time of the last request, if any
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }
}

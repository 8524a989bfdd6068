//! Scraper coordinator
//!
//! Drives one game id through cache lookup, fetch, page validation, field
//! extraction, optional variant expansion and persistence. Every request is
//! awaited in order; the rate limiter spaces them out.

use crate::config::Config;
use crate::images::ImageDownloader;
use crate::record::{GameRecord, VariantReference};
use crate::scraper::parser::{parse_catalog_id, parse_product_page, ParsedProduct};
use crate::scraper::{build_http_client, fetch_text, RateLimiter};
use crate::storage::RecordStore;
use crate::url::{game_url, parse_game_id};
use crate::{Result, ScrapeError};
use reqwest::Client;
use url::Url;

/// Scraper for catalog product pages
pub struct PriceChartingScraper {
    config: Config,
    client: Client,
    limiter: RateLimiter,
    store: RecordStore,
    images: ImageDownloader,
}

impl PriceChartingScraper {
    /// Creates a scraper instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(PriceChartingScraper)` - Ready to fetch
    /// * `Err(ScrapeError)` - The HTTP client or record directory could not
    ///   be set up
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.scraper)?;
        let store = RecordStore::new(&config.output.json_dir, config.max_age())?;
        let images = ImageDownloader::new(client.clone(), &config.output.image_dir);
        let limiter = RateLimiter::new(&config.rate_limit);

        Ok(Self {
            config,
            client,
            limiter,
            store,
            images,
        })
    }

    /// The configuration this scraper runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The record cache, including this run's saved/cached bookkeeping
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Resolves a command-line argument to a game id
    ///
    /// Accepts a numeric id, a catalog URL ending in an id, or a page URL
    /// (`http://`, `https://` or `www.`) whose "PriceCharting ID:" row holds
    /// the id. Only the last form costs a request.
    pub async fn resolve_game_id(&mut self, input: &str) -> Result<u64> {
        let input = input.trim();
        if let Some(id) = parse_game_id(input) {
            return Ok(id);
        }

        let unresolved = |reason: &str| ScrapeError::UnresolvedGameId {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let page_url = if input.starts_with("http://") || input.starts_with("https://") {
            input.to_string()
        } else if input.starts_with("www.") {
            format!("https://{}", input)
        } else {
            return Err(unresolved(
                "expected a numeric id or a valid pricecharting.com game URL",
            ));
        };
        let page_url = Url::parse(&page_url)?;

        tracing::info!("Looking up game id on {}", page_url);
        self.limiter.wait(false).await;
        let body = fetch_text(&self.client, page_url.as_str()).await?;

        parse_catalog_id(&body).ok_or_else(|| unresolved("no PriceCharting ID found on the page"))
    }

    /// Resolves an argument and fetches its record
    pub async fn process(&mut self, input: &str, scrape_variants: bool) -> Result<GameRecord> {
        let game_id = self.resolve_game_id(input).await?;
        self.fetch_game_data(game_id, scrape_variants).await
    }

    /// Fetches one game, using the cache when it is fresh
    ///
    /// Transport and validation failures produce an error record
    /// (`success = false`), which is persisted unless a fresh cached record
    /// exists. With `scrape_variants`, the page is fetched even when the
    /// parent is cached, so its variants can be discovered; the cached
    /// parent is returned unchanged in that case.
    ///
    /// # Returns
    ///
    /// * `Ok(GameRecord)` - The fetched, cached or error record
    /// * `Err(ScrapeError)` - The record could not be persisted
    pub async fn fetch_game_data(
        &mut self,
        game_id: u64,
        scrape_variants: bool,
    ) -> Result<GameRecord> {
        let cached = self.store.load_fresh(game_id);

        if !scrape_variants {
            if let Some(record) = cached {
                tracing::info!("Using cached data for game {}", game_id);
                return Ok(record);
            }
        }

        let ParsedProduct { record, variants } = match self.fetch_product(game_id, false).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!("Error fetching game {}: {}", game_id, e);
                let record = GameRecord::error(game_id);
                if cached.is_none() {
                    self.store.save(game_id, &record)?;
                }
                return Ok(record);
            }
        };

        let result = match cached {
            Some(cached) => {
                tracing::info!("Using cached data for game {}", game_id);
                cached
            }
            None => {
                self.store.save(game_id, &record)?;
                self.download_image(game_id, &record).await;
                record
            }
        };

        if scrape_variants {
            self.process_variants(game_id, &variants).await;
        }

        Ok(result)
    }

    /// Rate-limits, fetches and validates one product page
    async fn fetch_product(&mut self, game_id: u64, is_variant: bool) -> Result<ParsedProduct> {
        self.limiter.wait(is_variant).await;

        let url = game_url(&self.config.scraper.base_url, game_id);
        let body = fetch_text(&self.client, &url).await?;

        parse_product_page(&body, game_id).ok_or(ScrapeError::PageMismatch { expected: game_id })
    }

    /// Fetches every variant that is not freshly cached, in page order
    ///
    /// A failing variant is recorded and skipped; it never stops the others.
    async fn process_variants(&mut self, parent_id: u64, variants: &[VariantReference]) {
        if variants.is_empty() {
            tracing::debug!("No variants listed for game {}", parent_id);
            return;
        }
        tracing::info!("Found {} variants for game {}", variants.len(), parent_id);

        for variant in variants {
            if variant.id == parent_id {
                continue;
            }
            if self.store.load_fresh(variant.id).is_some() {
                tracing::info!("Using cached data for variant {}", variant.id);
                continue;
            }

            let record = match self.fetch_product(variant.id, true).await {
                Ok(parsed) => {
                    let mut record = parsed.record;
                    record.set_variant(&variant.variant_name);
                    record
                }
                Err(e) => {
                    tracing::error!(
                        "Error fetching variant {} ({}): {}",
                        variant.id,
                        variant.variant_name,
                        e
                    );
                    GameRecord::error(variant.id)
                }
            };

            if let Err(e) = self.store.save(variant.id, &record) {
                tracing::error!("Failed to save variant {}: {}", variant.id, e);
                continue;
            }
            self.download_image(variant.id, &record).await;
        }
    }

    /// Downloads the image of a freshly fetched record
    async fn download_image(&self, game_id: u64, record: &GameRecord) {
        if !record.success {
            return;
        }
        if let Some(url) = &record.image_url {
            self.images.download_logged(url, &game_id.to_string()).await;
        }
    }
}

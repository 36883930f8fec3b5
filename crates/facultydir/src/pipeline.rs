use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::aggregate::aggregate;
use crate::config::PipelineConfig;
use crate::fetcher::{FetchError, HttpFetcher, PageSource};
use crate::parser::{parse_cards, parse_profile};
use crate::types::{FacultyRecord, ProfileFields};

/// Politeness pause the driver takes after every profile request.
pub trait Throttle {
    fn pause(&self) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Throttle for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.0).await;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Throttle for NoDelay {
    async fn pause(&self) {}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub listings_fetched: usize,
    pub listings_failed: usize,
    pub cards_found: usize,
    pub cards_skipped: usize,
    pub profiles_failed: usize,
    pub records: usize,
}

impl Display for CrawlStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Listings fetched: {}", self.listings_fetched)?;
        writeln!(f, "  Listings failed:  {}", self.listings_failed)?;
        writeln!(f, "  Cards found:      {}", self.cards_found)?;
        writeln!(f, "  Cards skipped:    {}", self.cards_skipped)?;
        writeln!(f, "  Profiles failed:  {}", self.profiles_failed)?;
        writeln!(f, "  Records:          {}", self.records)
    }
}

#[derive(Debug, Clone)]
pub struct Crawl {
    /// Listing order, then card order within each listing.
    pub records: Vec<FacultyRecord>,
    pub stats: CrawlStats,
}

/// Sequential crawl over a fixed list of listing pages.
#[derive(Debug, Clone)]
pub struct Pipeline<S, T> {
    source: S,
    throttle: T,
    listing_urls: Vec<String>,
}

impl Pipeline<HttpFetcher, FixedDelay> {
    pub fn from_config(config: PipelineConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config.headers, config.timeout)?;
        Ok(Self::new(
            fetcher,
            FixedDelay(config.delay),
            config.listing_urls,
        ))
    }
}

impl<S: PageSource, T: Throttle> Pipeline<S, T> {
    pub fn new(source: S, throttle: T, listing_urls: Vec<String>) -> Self {
        Self {
            source,
            throttle,
            listing_urls,
        }
    }

    pub fn listing_urls(&self) -> &[String] {
        &self.listing_urls
    }

    pub async fn run(&self) -> Crawl {
        let mut records = Vec::new();
        let mut stats = CrawlStats::default();

        for url in &self.listing_urls {
            log::info!("Scraping listing {}...", url);
            let html = match self.source.fetch(url).await {
                Ok(html) => html,
                Err(e) => {
                    log::warn!("Listing {} contributed no records: {}", url, e);
                    stats.listings_failed += 1;
                    continue;
                }
            };
            stats.listings_fetched += 1;

            let cards = parse_cards(&html, url);
            log::info!("Found {} faculty card(s) on {}", cards.len(), url);
            stats.cards_found += cards.len();

            for card in cards {
                let card = match card {
                    Ok(card) => card,
                    Err(e) => {
                        log::error!("Skipping card on {}: {}", url, e);
                        stats.cards_skipped += 1;
                        continue;
                    }
                };

                let profile = match self.fetch_profile(&card.profile_url).await {
                    Some(profile) => profile,
                    None => {
                        stats.profiles_failed += 1;
                        ProfileFields::unavailable()
                    }
                };

                match aggregate(card, profile) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        log::error!("Skipping card on {}: {}", url, e);
                        stats.cards_skipped += 1;
                    }
                }
            }
        }

        stats.records = records.len();
        log::info!(
            "Crawl finished: {} record(s) from {} listing(s)",
            stats.records,
            stats.listings_fetched
        );
        Crawl { records, stats }
    }

    /// Fetches and parses one profile page, then pauses whether or not the
    /// fetch succeeded.
    pub async fn fetch_profile(&self, url: &str) -> Option<ProfileFields> {
        log::debug!("Fetching profile {}", url);
        let result = self.source.fetch(url).await;
        self.throttle.pause().await;

        match result {
            Ok(html) => Some(parse_profile(&html)),
            Err(e) => {
                log::warn!("Profile {} unavailable: {}", url, e);
                None
            }
        }
    }
}

//! Fixture-backed marketplaces
//!
//! Stand-ins for the real marketplace APIs. Each marketplace returns a
//! fixed set of listings whose titles are built from the query.

use super::traits::*;
use crate::config::MarketplaceConfig;
use crate::listings::{Listing, SaleType};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Marketplace that serves canned listings
pub struct MockMarketplace {
    id: String,
    name: String,
    about: MarketplaceAbout,
    latency: Duration,
}

impl MockMarketplace {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            about: MarketplaceAbout::new(""),
            latency: Duration::ZERO,
        }
    }

    /// Delay every fetch by roughly `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_about(mut self, about: MarketplaceAbout) -> Self {
        self.about = about;
        self
    }

    async fn simulate_latency(&self) {
        if self.latency.is_zero() {
            return;
        }
        let max_jitter = (self.latency.as_millis() as u64 / 10).max(1);
        let jitter = rand::thread_rng().gen_range(0..=max_jitter);
        tokio::time::sleep(self.latency + Duration::from_millis(jitter)).await;
    }

    fn fixtures(&self, query: &str) -> Vec<Listing> {
        let now = Utc::now();
        let name = self.name.as_str();

        match self.id.as_str() {
            "ebay" => vec![Listing::new(
                "eb1",
                name,
                format!("{} - PSA 10 Gem Mint", query),
                15000.0,
                "https://ebay.com/sample",
            )
            .with_grade("PSA", "10")
            .with_auction_end(now + ChronoDuration::days(3))
            .with_bids(24)],
            "goldin" => vec![
                Listing::new(
                    "g1",
                    name,
                    format!("{} Premium Auction - PSA 9", query),
                    8500.0,
                    "https://goldin.co/sample",
                )
                .with_grade("PSA", "9")
                .with_auction_end(now + ChronoDuration::days(7))
                .with_bids(18)
                .with_watchers(145),
                Listing::new(
                    "g2",
                    name,
                    format!("{} Elite Collection BGS 9.5", query),
                    12000.0,
                    "https://goldin.co/sample2",
                )
                .with_grade("BGS", "9.5"),
            ],
            "pwcc" => vec![Listing::new(
                "p1",
                name,
                format!("{} - Weekly Auction PSA 10", query),
                14500.0,
                "https://pwcc.com/sample",
            )
            .with_grade("PSA", "10")
            .with_auction_end(now + ChronoDuration::days(5))
            .with_bids(31)],
            "comc" => vec![
                Listing::new(
                    "c1",
                    name,
                    format!("{} Raw Near Mint", query),
                    2500.0,
                    "https://comc.com/sample",
                )
                .with_condition("Near Mint"),
                Listing::new(
                    "c2",
                    name,
                    format!("{} PSA 8", query),
                    4200.0,
                    "https://comc.com/sample2",
                )
                .with_grade("PSA", "8")
                .with_sale_type(SaleType::BestOffer),
            ],
            "myslabs" => vec![Listing::new(
                "m1",
                name,
                format!("{} SGC 10 Gold Label", query),
                11000.0,
                "https://myslabs.com/sample",
            )
            .with_grade("SGC", "10")],
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl Marketplace for MockMarketplace {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> MarketplaceAbout {
        self.about.clone()
    }

    async fn fetch_listings(&self, query: &str) -> anyhow::Result<Vec<Listing>> {
        self.simulate_latency().await;
        let listings = self.fixtures(query);
        debug!("{} produced {} listings", self.id, listings.len());
        Ok(listings)
    }

    fn init(&mut self, config: &MarketplaceConfig) -> anyhow::Result<()> {
        if !config.name.is_empty() {
            self.name = config.name.clone();
        }
        self.about = MarketplaceAbout::new(config.description.clone())
            .available(config.available)
            .auth_required(config.requires_auth);
        Ok(())
    }
}

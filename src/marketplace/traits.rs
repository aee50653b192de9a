//! Marketplace traits and types

use crate::config::MarketplaceConfig;
use crate::listings::Listing;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Marketplace metadata shown to collectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketplaceAbout {
    /// Short description
    pub description: String,
    /// Whether the marketplace can be searched right now
    pub available: bool,
    /// Whether searching needs an account
    pub requires_auth: bool,
    /// Website URL
    pub website: Option<String>,
}

impl Default for MarketplaceAbout {
    fn default() -> Self {
        Self {
            description: String::new(),
            available: true,
            requires_auth: false,
            website: None,
        }
    }
}

impl MarketplaceAbout {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn auth_required(mut self, required: bool) -> Self {
        self.requires_auth = required;
        self
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }
}

/// A source of card listings.
///
/// Implementations are queried independently and concurrently; one
/// marketplace failing never affects another.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Marketplace id ("ebay", "goldin", ...)
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// Metadata about the marketplace; searchable unless overridden
    fn about(&self) -> MarketplaceAbout {
        MarketplaceAbout::default()
    }

    /// Default timeout in seconds
    fn timeout(&self) -> f64 {
        5.0
    }

    /// Listings matching `query`
    async fn fetch_listings(&self, query: &str) -> anyhow::Result<Vec<Listing>>;

    /// Optional initialization from configuration
    fn init(&mut self, _config: &MarketplaceConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

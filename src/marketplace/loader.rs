//! Marketplace loader for initializing marketplaces from configuration

use super::mock::MockMarketplace;
use super::registry::MarketplaceRegistry;
use super::traits::Marketplace;
use crate::config::{MarketplaceConfig, Settings};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Loader for initializing marketplaces from configuration
pub struct MarketplaceLoader;

impl MarketplaceLoader {
    /// Load all marketplaces from settings
    pub fn load(settings: &Settings) -> Result<MarketplaceRegistry> {
        let mut registry = MarketplaceRegistry::new();
        let latency = Duration::from_millis(settings.search.simulated_latency_ms);

        for config in &settings.marketplaces {
            if config.disabled {
                info!("Skipping disabled marketplace: {}", config.id);
                continue;
            }

            match Self::create_marketplace(config, latency) {
                Ok(marketplace) => {
                    info!("Loaded marketplace: {} ({})", config.id, config.kind);
                    registry.register(marketplace, config.clone());
                }
                Err(e) => {
                    warn!("Failed to load marketplace {}: {}", config.id, e);
                }
            }
        }

        info!("Loaded {} marketplaces", registry.len());
        Ok(registry)
    }

    /// Create a marketplace instance for a config entry
    fn create_marketplace(
        config: &MarketplaceConfig,
        latency: Duration,
    ) -> Result<Arc<dyn Marketplace>> {
        if config.id.trim().is_empty() {
            return Err(anyhow::anyhow!("Marketplace id must not be empty"));
        }

        let mut marketplace: Box<dyn Marketplace> = match config.kind.as_str() {
            "mock" => Box::new(
                MockMarketplace::new(config.id.clone(), config.name.clone()).with_latency(latency),
            ),
            other => {
                return Err(anyhow::anyhow!("Unknown marketplace kind: {}", other));
            }
        };

        marketplace.init(config)?;

        Ok(Arc::from(marketplace))
    }

    /// Get list of available marketplace kinds
    pub fn available_kinds() -> Vec<&'static str> {
        vec!["mock"]
    }
}

//! Application state shared across handlers

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::marketplace::MarketplaceRegistry;
use crate::metrics::Metrics;
use crate::photos::{ImageExtractor, MockImageExtractor};
use crate::saved::SavedSearchStore;
use crate::search::Aggregator;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Marketplace registry
    pub registry: Arc<MarketplaceRegistry>,
    /// Marketplace search executor
    pub aggregator: Arc<Aggregator>,
    /// Saved searches
    pub saved: Arc<SavedSearchStore>,
    /// Card catalog
    pub catalog: Arc<Catalog>,
    /// Listing image extraction
    pub extractor: Arc<dyn ImageExtractor>,
    /// Marketplace metrics
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        settings: Settings,
        registry: MarketplaceRegistry,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let registry = Arc::new(registry);
        let metrics = Arc::new(Metrics::new());

        let aggregator = Aggregator::new(registry.clone())
            .with_metrics(metrics.clone())
            .with_timeout(seconds(settings.search.source_timeout))
            .with_max_timeout(seconds(settings.search.max_source_timeout));

        let saved =
            SavedSearchStore::open_with_key(storage, settings.storage.saved_searches_key.clone());

        let catalog = Catalog::builtin()
            .with_latency(Duration::from_millis(settings.catalog.simulated_latency_ms));

        let extractor = MockImageExtractor::new()
            .with_latency(Duration::from_millis(settings.search.simulated_latency_ms));

        Self {
            settings: Arc::new(settings),
            registry,
            aggregator: Arc::new(aggregator),
            saved: Arc::new(saved),
            catalog: Arc::new(catalog),
            extractor: Arc::new(extractor),
            metrics,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::from_secs(5))
}

//! Marketplace registry for managing available listing sources

use super::traits::Marketplace;
use crate::config::MarketplaceConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all known marketplaces
pub struct MarketplaceRegistry {
    /// Marketplaces by id
    marketplaces: HashMap<String, Arc<dyn Marketplace>>,
    /// Marketplace configurations
    configs: HashMap<String, MarketplaceConfig>,
    /// Ids in registration order
    order: Vec<String>,
}

impl MarketplaceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            marketplaces: HashMap::new(),
            configs: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a marketplace, replacing any previous one with the same id
    pub fn register(&mut self, marketplace: Arc<dyn Marketplace>, config: MarketplaceConfig) {
        let id = marketplace.id().to_string();

        if !self.marketplaces.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.marketplaces.insert(id.clone(), marketplace);
        self.configs.insert(id, config);
    }

    /// Get a marketplace by id
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Marketplace>> {
        self.marketplaces.get(id)
    }

    /// Get marketplace config
    pub fn get_config(&self, id: &str) -> Option<&MarketplaceConfig> {
        self.configs.get(id)
    }

    /// Whether a marketplace can be searched: configured available and
    /// reporting itself available. `register` always stores a config, so
    /// a missing config only defers to the marketplace's own `about()`.
    pub fn is_available(&self, id: &str) -> bool {
        let configured = self.configs.get(id).map(|c| c.available).unwrap_or(true);
        configured
            && self
                .marketplaces
                .get(id)
                .map(|m| m.about().available)
                .unwrap_or(false)
    }

    /// All marketplaces in registration order
    pub fn all(&self) -> Vec<&Arc<dyn Marketplace>> {
        self.order
            .iter()
            .filter_map(|id| self.marketplaces.get(id))
            .collect()
    }

    /// Searchable marketplaces in registration order
    pub fn available(&self) -> Vec<&Arc<dyn Marketplace>> {
        self.order
            .iter()
            .filter(|id| self.is_available(id))
            .filter_map(|id| self.marketplaces.get(id))
            .collect()
    }

    /// All marketplace ids in registration order
    pub fn ids(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.marketplaces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.marketplaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marketplaces.is_empty()
    }

    /// Get effective timeout for a marketplace
    pub fn get_timeout(&self, id: &str, default: f64) -> f64 {
        self.configs
            .get(id)
            .and_then(|c| c.timeout)
            .or_else(|| self.marketplaces.get(id).map(|m| m.timeout()))
            .unwrap_or(default)
    }
}

impl Default for MarketplaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::mock::MockMarketplace;

    fn mock(id: &str, name: &str) -> Arc<dyn Marketplace> {
        Arc::new(MockMarketplace::new(id, name))
    }

    #[test]
    fn test_registry() {
        let mut registry = MarketplaceRegistry::new();
        registry.register(mock("ebay", "eBay"), MarketplaceConfig::new("ebay", "eBay"));
        registry.register(mock("goldin", "Goldin"), MarketplaceConfig::new("goldin", "Goldin"));

        assert!(registry.contains("ebay"));
        assert_eq!(registry.ids(), vec!["ebay", "goldin"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.get("pwcc").is_none());
    }

    #[test]
    fn test_availability_follows_config() {
        let mut registry = MarketplaceRegistry::new();
        registry.register(mock("ebay", "eBay"), MarketplaceConfig::new("ebay", "eBay"));
        registry.register(
            mock("alt", "Alt"),
            MarketplaceConfig {
                available: false,
                ..MarketplaceConfig::new("alt", "Alt")
            },
        );

        assert!(registry.is_available("ebay"));
        assert!(!registry.is_available("alt"));
        assert!(!registry.is_available("missing"));
        assert_eq!(registry.available().len(), 1);
        assert_eq!(registry.all().len(), 2);
    }

    #[test]
    fn test_timeout_resolution() {
        let mut registry = MarketplaceRegistry::new();
        registry.register(
            mock("ebay", "eBay"),
            MarketplaceConfig {
                timeout: Some(1.5),
                ..MarketplaceConfig::new("ebay", "eBay")
            },
        );
        registry.register(mock("comc", "COMC"), MarketplaceConfig::new("comc", "COMC"));

        assert_eq!(registry.get_timeout("ebay", 9.0), 1.5);
        assert_eq!(registry.get_timeout("comc", 9.0), 5.0);
        assert_eq!(registry.get_timeout("missing", 9.0), 9.0);
    }
}

//! Settings structures for card-scout configuration

use crate::listings::SortKey;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub search: SearchSettings,
    pub catalog: CatalogSettings,
    pub marketplaces: Vec<MarketplaceConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            search: SearchSettings::default(),
            catalog: CatalogSettings::default(),
            marketplaces: default_marketplaces(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (CARDSCOUT_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("CARDSCOUT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("CARDSCOUT_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("CARDSCOUT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("CARDSCOUT_STORAGE_DIR") {
            self.storage.dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("CARDSCOUT_SIMULATED_LATENCY_MS") {
            if let Ok(ms) = val.parse() {
                self.search.simulated_latency_ms = ms;
            }
        }
    }

    /// Get marketplace config by id
    pub fn get_marketplace(&self, id: &str) -> Option<&MarketplaceConfig> {
        self.marketplaces.iter().find(|m| m.id == id)
    }

    /// Get all marketplaces that are not disabled
    pub fn enabled_marketplaces(&self) -> Vec<&MarketplaceConfig> {
        self.marketplaces.iter().filter(|m| !m.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Card Scout".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8890,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Where saved searches are persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage directory (none = platform data directory)
    pub dir: Option<PathBuf>,
    /// Key the saved search collection is stored under
    pub saved_searches_key: String,
    /// Keep everything in memory (nothing survives a restart)
    pub in_memory: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: None,
            saved_searches_key: crate::saved::DEFAULT_STORAGE_KEY.to_string(),
            in_memory: false,
        }
    }
}

/// Marketplace search behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Marketplaces searched when a request names none
    pub default_sources: Vec<String>,
    /// Sort used when a request names none
    pub default_sort: SortKey,
    /// Per-marketplace timeout in seconds
    pub source_timeout: f64,
    /// Upper bound for any per-marketplace timeout
    pub max_source_timeout: f64,
    /// Artificial latency added by mock marketplaces, in milliseconds
    pub simulated_latency_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_sources: vec![
                "ebay".to_string(),
                "goldin".to_string(),
                "pwcc".to_string(),
            ],
            default_sort: SortKey::PriceDesc,
            source_timeout: 5.0,
            max_source_timeout: 30.0,
            simulated_latency_ms: 0,
        }
    }
}

/// Card catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Cards per result page
    pub per_page: usize,
    /// Artificial latency of a catalog search, in milliseconds
    pub simulated_latency_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            per_page: 6,
            simulated_latency_ms: 0,
        }
    }
}

/// Individual marketplace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Marketplace id (unique identifier)
    pub id: String,
    /// Display name
    pub name: String,
    /// Implementation to use
    pub kind: String,
    pub description: String,
    /// Whether the marketplace is left out of the registry entirely
    pub disabled: bool,
    /// Whether the marketplace can currently be searched
    pub available: bool,
    pub requires_auth: bool,
    /// Custom timeout for this marketplace
    pub timeout: Option<f64>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: "mock".to_string(),
            description: String::new(),
            disabled: false,
            available: true,
            requires_auth: false,
            timeout: None,
        }
    }
}

impl MarketplaceConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Default marketplace configurations
fn default_marketplaces() -> Vec<MarketplaceConfig> {
    vec![
        MarketplaceConfig {
            description: "World's largest online marketplace".to_string(),
            ..MarketplaceConfig::new("ebay", "eBay")
        },
        MarketplaceConfig {
            description: "Premium sports card auction house".to_string(),
            ..MarketplaceConfig::new("goldin", "Goldin")
        },
        MarketplaceConfig {
            description: "Premier auction house for trading cards".to_string(),
            ..MarketplaceConfig::new("pwcc", "PWCC")
        },
        MarketplaceConfig {
            description: "Check Out My Cards marketplace".to_string(),
            ..MarketplaceConfig::new("comc", "COMC")
        },
        MarketplaceConfig {
            description: "Graded card marketplace".to_string(),
            ..MarketplaceConfig::new("myslabs", "MySlabs")
        },
        MarketplaceConfig {
            description: "Alternative asset investment platform".to_string(),
            available: false,
            requires_auth: true,
            ..MarketplaceConfig::new("alt", "Alt")
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8890);
        assert!(!settings.general.debug);
        assert_eq!(settings.marketplaces.len(), 6);
        assert_eq!(settings.catalog.per_page, 6);
        assert_eq!(settings.search.default_sort, SortKey::PriceDesc);
    }

    #[test]
    fn test_marketplace_lookup() {
        let settings = Settings::default();
        let alt = settings.get_marketplace("alt").unwrap();
        assert!(!alt.available);
        assert!(alt.requires_auth);
        assert_eq!(settings.get_marketplace("ebay").unwrap().name, "eBay");
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
server:
  port: 9000
search:
  default_sort: ending-soon
  source_timeout: 2.5
marketplaces:
  - id: ebay
    name: eBay
  - id: comc
    name: COMC
    disabled: true
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(settings.search.default_sort, SortKey::EndingSoonest);
        assert_eq!(settings.search.source_timeout, 2.5);
        assert_eq!(settings.marketplaces.len(), 2);
        assert_eq!(settings.enabled_marketplaces().len(), 1);
        assert_eq!(settings.marketplaces[0].kind, "mock");
    }

    #[test]
    fn test_from_yaml_without_marketplaces_uses_builtin() {
        let settings = Settings::from_yaml("general:\n  debug: true\n").unwrap();
        assert!(settings.general.debug);
        assert_eq!(settings.marketplaces.len(), 6);
    }
}

//! Marketplace search query and outcome models

use crate::listings::{price_range, Listing, PriceRange, SortKey, SourceUnavailable, Timing};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bad caller input; the message is meant to be shown to the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a search query")]
    EmptyQuery,
    #[error("Please select at least one marketplace")]
    NoSources,
}

/// A search across several marketplaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceQuery {
    /// Free-text query
    pub query: String,
    /// Marketplace ids to search, in the order results are merged
    pub sources: Vec<String>,
    /// Order applied to the merged listings
    #[serde(default)]
    pub sort: SortKey,
    /// Custom per-marketplace timeout in seconds
    pub timeout_limit: Option<f64>,
}

impl MarketplaceQuery {
    pub fn new<I, S>(query: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            sort: SortKey::default(),
            timeout_limit: None,
        }
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_limit = Some(seconds);
        self
    }

    /// Check the query is searchable. The query text is checked first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if self.enabled_sources().is_empty() {
            return Err(ValidationError::NoSources);
        }
        Ok(())
    }

    /// Distinct, non-blank source ids in first-seen order
    pub fn enabled_sources(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

/// Merged, sorted listings of one marketplace search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedListings {
    pub query: String,
    pub sort: SortKey,
    /// Marketplaces that were searched
    pub sources: Vec<String>,
    pub listings: Vec<Listing>,
    /// Marketplaces that contributed nothing because they failed
    pub unavailable: Vec<SourceUnavailable>,
    pub timings: Vec<Timing>,
}

impl AggregatedListings {
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn price_range(&self) -> PriceRange {
        price_range(&self.listings)
    }

    /// Whether every searched marketplace answered
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }
}

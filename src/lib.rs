//! Card Scout: a sports card collector backend
//!
//! Searches a card catalog, keeps saved searches, estimates grading
//! outcomes and aggregates listings from several marketplaces into one
//! sorted result set.

pub mod catalog;
pub mod config;
pub mod grading;
pub mod listings;
pub mod marketplace;
pub mod metrics;
pub mod photos;
pub mod saved;
pub mod search;
pub mod storage;
pub mod web;

pub use config::Settings;
pub use listings::{Listing, SortKey};
pub use marketplace::Marketplace;
pub use saved::{SavedSearch, SavedSearchStore, SearchCriteria};
pub use search::{AggregatedListings, Aggregator, MarketplaceQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

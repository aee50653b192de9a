//! Saved searches
//!
//! Named snapshots of card search criteria, persisted through an injected
//! key-value storage.

mod models;
mod store;

pub use models::*;
pub use store::{SavedSearchStore, DEFAULT_STORAGE_KEY};

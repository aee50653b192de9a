//! Saved search store with write-through persistence

use super::models::{SavedSearch, SearchCriteria};
use crate::storage::KeyValueStore;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Storage key the collection is persisted under by default
pub const DEFAULT_STORAGE_KEY: &str = "savedSearches";

/// Owns the ordered collection of saved searches.
///
/// Every mutation writes the whole collection back to storage as a JSON
/// array. Storage failures are logged and never surface to callers: the
/// in-memory collection stays authoritative for the life of the store.
pub struct SavedSearchStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    searches: RwLock<Vec<SavedSearch>>,
}

impl SavedSearchStore {
    /// Open the store under the default key
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Open the store, loading whatever is persisted under `key`.
    ///
    /// Absent or unreadable data yields an empty collection.
    pub fn open_with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let searches = Self::restore(storage.as_ref(), &key);
        info!("Loaded {} saved searches", searches.len());

        Self {
            storage,
            key,
            searches: RwLock::new(searches),
        }
    }

    fn restore(storage: &dyn KeyValueStore, key: &str) -> Vec<SavedSearch> {
        let raw = match storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read saved searches, starting empty: {}", e);
                return Vec::new();
            }
        };

        let mut searches: Vec<SavedSearch> = match serde_json::from_str(&raw) {
            Ok(searches) => searches,
            Err(e) => {
                warn!("Discarding corrupt saved searches: {}", e);
                return Vec::new();
            }
        };

        // Keep the first entry for any id that was persisted twice
        let mut seen = std::collections::HashSet::new();
        searches.retain(|s| seen.insert(s.id.clone()));
        searches
    }

    /// Save a snapshot of `criteria`. Always succeeds.
    pub fn save(&self, criteria: SearchCriteria) -> SavedSearch {
        let mut searches = self.searches.write().unwrap();

        let mut id = Uuid::new_v4().to_string();
        while searches.iter().any(|s| s.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let saved = SavedSearch::new(id, criteria);
        searches.push(saved.clone());
        self.persist(&searches);

        debug!("Saved search {} ({})", saved.id, saved.name);
        saved
    }

    /// Delete the entry with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut searches = self.searches.write().unwrap();
        let before = searches.len();
        searches.retain(|s| s.id != id);
        let removed = searches.len() != before;

        self.persist(&searches);

        if removed {
            debug!("Deleted saved search {}", id);
        }
        removed
    }

    /// All saved searches in insertion order
    pub fn list(&self) -> Vec<SavedSearch> {
        self.searches.read().unwrap().clone()
    }

    /// Criteria stored under `id`, for reuse as the active query
    pub fn load(&self, id: &str) -> Option<SearchCriteria> {
        self.get(id).map(|s| s.criteria)
    }

    /// The saved search with `id`
    pub fn get(&self, id: &str) -> Option<SavedSearch> {
        self.searches
            .read()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.searches.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.read().unwrap().is_empty()
    }

    fn persist(&self, searches: &[SavedSearch]) {
        let json = match serde_json::to_string(searches) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize saved searches: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.key, &json) {
            error!("Failed to persist saved searches: {}", e);
        }
    }
}

//! Card catalog
//!
//! Filtering, ordering and pagination over the card catalog.

mod cards;

pub use cards::{builtin_cards, CatalogCard, ALL_SPORTS};

use crate::saved::SearchCriteria;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Default number of cards per page
pub const DEFAULT_PER_PAGE: usize = 6;

/// Order of catalog search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSort {
    /// Highest ungraded value first
    #[default]
    Value,
    /// Newest first
    Year,
    /// Player name A-Z
    Player,
}

impl CardSort {
    fn compare(&self, a: &CatalogCard, b: &CatalogCard) -> Ordering {
        match self {
            Self::Value => b.ungraded_value.cmp(&a.ungraded_value),
            Self::Year => b.year_number().cmp(&a.year_number()),
            Self::Player => a
                .player
                .to_lowercase()
                .cmp(&b.player.to_lowercase())
                .then_with(|| a.player.cmp(&b.player)),
        }
    }
}

impl FromStr for CardSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "value" => Ok(Self::Value),
            "year" => Ok(Self::Year),
            "player" => Ok(Self::Player),
            other => Err(anyhow::anyhow!("Unknown card sort: {}", other)),
        }
    }
}

/// Stable sort of catalog cards
pub fn sort_cards(cards: &mut [CatalogCard], sort: CardSort) {
    cards.sort_by(|a, b| sort.compare(a, b));
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Slice `items` into the 1-indexed `page`; out-of-range pages are empty
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let start = (page - 1).saturating_mul(per_page);

    Page {
        items: items.iter().skip(start).take(per_page).cloned().collect(),
        page,
        per_page,
        total_pages: items.len().div_ceil(per_page),
        total: items.len(),
    }
}

/// The searchable card catalog
pub struct Catalog {
    cards: Vec<CatalogCard>,
    latency: Duration,
}

impl Catalog {
    pub fn new(cards: Vec<CatalogCard>) -> Self {
        Self {
            cards,
            latency: Duration::ZERO,
        }
    }

    /// Catalog of the built-in cards
    pub fn builtin() -> Self {
        Self::new(builtin_cards())
    }

    /// Delay every search by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&CatalogCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Cards matching `criteria`, in catalog order
    pub fn filter(&self, criteria: &SearchCriteria) -> Vec<CatalogCard> {
        self.cards
            .iter()
            .filter(|c| c.matches(criteria))
            .cloned()
            .collect()
    }

    /// Cards matching `criteria` in `sort` order
    pub async fn search(&self, criteria: &SearchCriteria, sort: CardSort) -> Vec<CatalogCard> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut cards = self.filter(criteria);
        sort_cards(&mut cards, sort);
        debug!("Catalog search matched {} cards", cards.len());
        cards
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

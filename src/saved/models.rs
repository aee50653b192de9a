//! Saved search data models

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown in a saved search name when no player was given
pub const ALL_PLAYERS: &str = "All Players";
/// Placeholder shown in a saved search name when no year was given
pub const ALL_YEARS: &str = "All Years";

/// Card search fields; blank fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    pub player: String,
    pub year: String,
    pub product: String,
    pub card_number: String,
    pub sport: String,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = player.into();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    pub fn with_card_number(mut self, card_number: impl Into<String>) -> Self {
        self.card_number = card_number.into();
        self
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = sport.into();
        self
    }

    /// True when every field is blank
    pub fn is_blank(&self) -> bool {
        [
            &self.player,
            &self.year,
            &self.product,
            &self.card_number,
            &self.sport,
        ]
        .iter()
        .all(|f| f.trim().is_empty())
    }

    /// Display name used when this criteria is saved
    pub fn display_name(&self) -> String {
        format!(
            "{} - {}",
            non_blank(&self.player).unwrap_or(ALL_PLAYERS),
            non_blank(&self.year).unwrap_or(ALL_YEARS)
        )
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// A named, persisted snapshot of search criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: String,
    pub name: String,
    pub criteria: SearchCriteria,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    /// Snapshot `criteria` under a new id
    pub fn new(id: impl Into<String>, criteria: SearchCriteria) -> Self {
        Self {
            id: id.into(),
            name: criteria.display_name(),
            criteria,
            // Stored with millisecond precision
            created_at: Utc::now().trunc_subsecs(3),
        }
    }
}

//! Listing type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single card offered on a marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Marketplace-local identifier
    pub id: String,
    /// Display name of the marketplace the listing came from
    pub marketplace: String,
    pub title: String,
    pub price: Price,
    /// Raw condition ("Near Mint", "Graded", ...)
    pub condition: Option<String>,
    /// Grade assigned by a grading company ("10", "9.5", ...)
    pub grade: Option<String>,
    /// Grading company ("PSA", "BGS", "SGC")
    pub grader: Option<String>,
    pub sale_type: SaleType,
    pub auction_end: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub bids: Option<u32>,
    pub watchers: Option<u32>,
    /// Link to the listing on the marketplace
    pub listing_url: String,
}

impl Listing {
    /// Create a buy-now listing priced in USD
    pub fn new(
        id: impl Into<String>,
        marketplace: impl Into<String>,
        title: impl Into<String>,
        amount: f64,
        listing_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            marketplace: marketplace.into(),
            title: title.into(),
            price: Price::usd(amount),
            condition: None,
            grade: None,
            grader: None,
            sale_type: SaleType::BuyNow,
            auction_end: None,
            image_url: None,
            bids: None,
            watchers: None,
            listing_url: listing_url.into(),
        }
    }

    pub fn with_sale_type(mut self, sale_type: SaleType) -> Self {
        self.sale_type = sale_type;
        self
    }

    /// Mark as an auction ending at `end`
    pub fn with_auction_end(mut self, end: DateTime<Utc>) -> Self {
        self.sale_type = SaleType::Auction;
        self.auction_end = Some(end);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Set the grading company and grade; condition becomes "Graded"
    pub fn with_grade(mut self, grader: impl Into<String>, grade: impl Into<String>) -> Self {
        self.condition = Some("Graded".to_string());
        self.grader = Some(grader.into());
        self.grade = Some(grade.into());
        self
    }

    pub fn with_bids(mut self, bids: u32) -> Self {
        self.bids = Some(bids);
        self
    }

    pub fn with_watchers(mut self, watchers: u32) -> Self {
        self.watchers = Some(watchers);
        self
    }

    /// Grade as shown to collectors, e.g. "PSA 10", falling back to the raw condition
    pub fn grade_label(&self) -> Option<String> {
        match (&self.grader, &self.grade) {
            (Some(grader), Some(grade)) => Some(format!("{} {}", grader, grade)),
            (None, Some(grade)) => Some(grade.clone()),
            _ => self.condition.clone(),
        }
    }

    pub fn is_auction(&self) -> bool {
        self.sale_type == SaleType::Auction
    }
}

/// Monetary amount with an ISO currency code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    pub fn usd(amount: f64) -> Self {
        Self::new(amount, "USD")
    }
}

/// How a listing is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaleType {
    Auction,
    BuyNow,
    BestOffer,
}

/// Why a marketplace contributed no listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum SourceError {
    #[error("Request timed out")]
    Timeout,
    #[error("Marketplace not registered")]
    NotRegistered,
    #[error("Marketplace unavailable")]
    Unavailable,
    #[error("Marketplace error: {0}")]
    Failed(String),
}

/// A marketplace that failed during an aggregated search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnavailable {
    pub source: String,
    pub error: SourceError,
}

/// Marketplace response timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    pub source: String,
    /// Response time in milliseconds
    pub time_ms: u64,
    pub listing_count: usize,
}

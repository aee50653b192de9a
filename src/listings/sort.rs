//! Listing ordering

use super::types::Listing;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Order applied to aggregated listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[serde(alias = "price-low")]
    PriceAsc,
    #[default]
    #[serde(alias = "price-high")]
    PriceDesc,
    #[serde(alias = "ending-soon")]
    EndingSoonest,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::EndingSoonest => "ending-soonest",
        }
    }

    /// Compare two listings under this key
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            Self::PriceAsc => a.price.amount.total_cmp(&b.price.amount),
            Self::PriceDesc => b.price.amount.total_cmp(&a.price.amount),
            Self::EndingSoonest => match (&a.auction_end, &b.auction_end) {
                (Some(a_end), Some(b_end)) => a_end.cmp(b_end),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price-asc" | "price-low" => Ok(Self::PriceAsc),
            "price-desc" | "price-high" => Ok(Self::PriceDesc),
            "ending-soonest" | "ending-soon" => Ok(Self::EndingSoonest),
            other => Err(anyhow::anyhow!("Unknown sort key: {}", other)),
        }
    }
}

/// Stable sort: listings comparing equal keep their relative order
pub fn sort_listings(listings: &mut [Listing], key: SortKey) {
    listings.sort_by(|a, b| key.compare(a, b));
}

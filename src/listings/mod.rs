//! Marketplace listings
//!
//! The listing model shared by every marketplace, plus ordering and
//! price statistics over aggregated listings.

mod sort;
mod stats;
mod types;

pub use sort::{sort_listings, SortKey};
pub use stats::{price_range, PriceRange};
pub use types::*;

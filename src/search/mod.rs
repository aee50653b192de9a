//! Marketplace search orchestration
//!
//! Validates marketplace queries, fans out to every enabled marketplace,
//! merges their listings and applies the requested order.

mod executor;
mod models;

pub use executor::Aggregator;
pub use models::*;

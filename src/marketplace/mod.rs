//! Marketplace module
//!
//! Defines the Marketplace trait and provides a registry for all listing
//! sources.

mod loader;
mod registry;
mod traits;

pub mod mock;

pub use loader::MarketplaceLoader;
pub use registry::MarketplaceRegistry;
pub use traits::*;

//! Web server module
//!
//! JSON API over the catalog, saved searches, grading tools and the
//! marketplace aggregator.

mod handlers;
mod routes;
mod state;

pub use handlers::ApiError;
pub use routes::create_router;
pub use state::AppState;

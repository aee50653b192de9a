//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Catalog
        .route("/api/cards/search", get(handlers::search_cards))
        // Saved searches
        .route(
            "/api/saved-searches",
            get(handlers::list_saved).post(handlers::save_search),
        )
        .route(
            "/api/saved-searches/:id",
            get(handlers::load_saved).delete(handlers::delete_saved),
        )
        // Marketplaces
        .route("/api/marketplaces", get(handlers::list_marketplaces))
        .route(
            "/api/marketplaces/search",
            get(handlers::search_marketplaces),
        )
        // Grading
        .route("/api/grading/estimate", post(handlers::grading_estimate))
        .route("/api/grading/services", get(handlers::grading_services))
        .route("/api/photos/extract", post(handlers::extract_photos))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

//! HTTP request handlers

use super::state::AppState;
use crate::catalog::{paginate, CardSort, CatalogCard, Page};
use crate::grading::{self, GradingEvaluation, GradingService, Turnaround};
use crate::listings::{Listing, PriceRange, SortKey, SourceUnavailable, Timing};
use crate::photos::PhotoSet;
use crate::saved::{SavedSearch, SearchCriteria};
use crate::search::MarketplaceQuery;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Error returned to API clients as `{ "error": message }`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

/// Query parameters for catalog search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSearchParams {
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub sport: String,
    pub sort: Option<String>,
    pub page: Option<usize>,
}

impl CardSearchParams {
    fn criteria(&self) -> SearchCriteria {
        SearchCriteria::new()
            .with_player(self.player.as_str())
            .with_year(self.year.as_str())
            .with_product(self.product.as_str())
            .with_card_number(self.card_number.as_str())
            .with_sport(self.sport.as_str())
    }
}

/// Catalog search handler
pub async fn search_cards(
    State(state): State<AppState>,
    Query(params): Query<CardSearchParams>,
) -> Result<Json<Page<CatalogCard>>, ApiError> {
    let sort = match params.sort.as_deref() {
        Some(s) => s
            .parse::<CardSort>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => CardSort::default(),
    };

    let cards = state.catalog.search(&params.criteria(), sort).await;
    let page = paginate(
        &cards,
        params.page.unwrap_or(1),
        state.settings.catalog.per_page,
    );
    Ok(Json(page))
}

/// List saved searches
pub async fn list_saved(State(state): State<AppState>) -> Json<Vec<SavedSearch>> {
    Json(state.saved.list())
}

/// Save the posted criteria
pub async fn save_search(
    State(state): State<AppState>,
    Json(criteria): Json<SearchCriteria>,
) -> impl IntoResponse {
    let saved = state.saved.save(criteria);
    (StatusCode::CREATED, Json(saved))
}

/// Criteria of a saved search
pub async fn load_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SearchCriteria>, ApiError> {
    state
        .saved
        .load(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No saved search with id {}", id)))
}

/// Delete a saved search; deleting an unknown id is not an error
pub async fn delete_saved(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.saved.delete(&id);
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub requires_auth: bool,
}

/// List all marketplaces
pub async fn list_marketplaces(State(state): State<AppState>) -> Json<Vec<MarketplaceInfo>> {
    let marketplaces = state
        .registry
        .all()
        .into_iter()
        .map(|m| {
            let about = m.about();
            MarketplaceInfo {
                id: m.id().to_string(),
                name: m.name().to_string(),
                description: about.description,
                available: state.registry.is_available(m.id()),
                requires_auth: about.requires_auth,
            }
        })
        .collect();
    Json(marketplaces)
}

/// Query parameters for marketplace search
#[derive(Debug, Deserialize)]
pub struct MarketplaceSearchParams {
    pub q: Option<String>,
    /// Marketplace ids (comma-separated)
    pub sources: Option<String>,
    pub sort: Option<String>,
}

/// Marketplace search response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceSearchResponse {
    pub query: String,
    pub sort: SortKey,
    pub sources: Vec<String>,
    pub number_of_listings: usize,
    pub listings: Vec<Listing>,
    pub price_range: PriceRange,
    pub unavailable: Vec<SourceUnavailable>,
    pub timings: Vec<Timing>,
}

/// Marketplace search handler
pub async fn search_marketplaces(
    State(state): State<AppState>,
    Query(params): Query<MarketplaceSearchParams>,
) -> Result<Json<MarketplaceSearchResponse>, ApiError> {
    let sort = match params.sort.as_deref() {
        Some(s) => s
            .parse::<SortKey>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => state.settings.search.default_sort,
    };

    let sources: Vec<String> = match params.sources {
        Some(ref list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => state.settings.search.default_sources.clone(),
    };

    let query = MarketplaceQuery::new(params.q.unwrap_or_default(), sources).with_sort(sort);
    let results = state
        .aggregator
        .execute(&query)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    debug!("Marketplace search returned {} listings", results.len());

    Ok(Json(MarketplaceSearchResponse {
        price_range: results.price_range(),
        number_of_listings: results.len(),
        query: results.query,
        sort: results.sort,
        sources: results.sources,
        listings: results.listings,
        unavailable: results.unavailable,
        timings: results.timings,
    }))
}

/// Grading estimate request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    #[serde(flatten)]
    pub evaluation: GradingEvaluation,
    pub card_value: Option<f64>,
    pub service: Option<GradingService>,
    pub turnaround: Option<Turnaround>,
}

/// Grading estimate handler
pub async fn grading_estimate(
    Json(request): Json<EstimateRequest>,
) -> Result<Json<grading::GradingEstimate>, ApiError> {
    grading::estimate(
        &request.evaluation,
        request.card_value,
        request.service,
        request.turnaround,
    )
    .map(Json)
    .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Grading services with their fees
pub async fn grading_services() -> impl IntoResponse {
    let services: Vec<_> = GradingService::all()
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s,
                "name": s.name(),
                "fee": s.fee(),
            })
        })
        .collect();
    let turnarounds: Vec<_> = [Turnaround::Economy, Turnaround::Regular, Turnaround::Express]
        .iter()
        .map(|t| serde_json::json!({ "id": t, "days": t.days() }))
        .collect();

    Json(serde_json::json!({
        "services": services,
        "turnarounds": turnarounds,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
}

/// Extract candidate card images from a listing; the first becomes the
/// front photo and the rest back photos
pub async fn extract_photos(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let images = state
        .extractor
        .extract(&request.url)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut photos = PhotoSet::new();
    for image in &images {
        photos.add(image.as_str());
    }

    Ok(Json(serde_json::json!({
        "images": images,
        "photos": photos.photos(),
    })))
}

/// Marketplace statistics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "searches": state.metrics.get_total_searches(),
        "rejected": state.metrics.get_rejected_searches(),
        "marketplaces": state.metrics.get_source_stats(),
    }))
}

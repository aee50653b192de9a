use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use card_scout::{
    config::Settings,
    marketplace::MarketplaceLoader,
    storage::{KeyValueStore, MemoryStorage},
    web::{create_router, AppState},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with_storage(storage: Arc<dyn KeyValueStore>) -> Router {
    let settings = Settings::default();
    let registry = MarketplaceLoader::load(&settings).unwrap();
    create_router(AppState::new(settings, registry, storage))
}

fn app() -> Router {
    app_with_storage(Arc::new(MemoryStorage::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn listing_ids(body: &Value) -> Vec<&str> {
    body["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["instance"], "Card Scout");
}

#[tokio::test]
async fn test_marketplace_search_default_sort() {
    let app = app();
    let (status, body) = send(
        &app,
        get("/api/marketplaces/search?q=Jordan&sources=ebay,goldin,pwcc"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sort"], "price-desc");
    assert_eq!(listing_ids(&body), vec!["eb1", "p1", "g2", "g1"]);
    assert_eq!(body["numberOfListings"], 4);
    assert_eq!(body["priceRange"]["min"], 8500.0);
    assert_eq!(body["priceRange"]["max"], 15000.0);
    assert_eq!(body["priceRange"]["average"], 12500.0);
    assert!(body["unavailable"].as_array().unwrap().is_empty());
    assert_eq!(
        body["listings"][0]["title"],
        "Jordan - PSA 10 Gem Mint"
    );
}

#[tokio::test]
async fn test_marketplace_search_price_ascending() {
    let (status, body) = send(
        &app(),
        get("/api/marketplaces/search?q=Jordan&sources=comc,myslabs&sort=price-asc"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing_ids(&body), vec!["c1", "c2", "m1"]);
}

#[tokio::test]
async fn test_marketplace_search_uses_default_sources() {
    let (status, body) = send(&app(), get("/api/marketplaces/search?q=Trout")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sources"], json!(["ebay", "goldin", "pwcc"]));
}

#[tokio::test]
async fn test_marketplace_search_validation() {
    let app = app();

    let (status, body) = send(&app, get("/api/marketplaces/search?q=%20&sources=ebay")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a search query");

    let (status, body) = send(&app, get("/api/marketplaces/search?q=Jordan&sources=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please select at least one marketplace");

    let (status, _) = send(
        &app,
        get("/api/marketplaces/search?q=Jordan&sources=ebay&sort=cheapest"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stats) = send(&app, get("/stats")).await;
    assert_eq!(stats["rejected"], 2);
    assert_eq!(stats["searches"], 0);
}

#[tokio::test]
async fn test_marketplace_search_unavailable_source() {
    let (status, body) = send(
        &app(),
        get("/api/marketplaces/search?q=Jordan&sources=alt,myslabs"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing_ids(&body), vec!["m1"]);
    assert_eq!(body["unavailable"][0]["source"], "alt");
}

#[tokio::test]
async fn test_list_marketplaces() {
    let (status, body) = send(&app(), get("/api/marketplaces")).await;
    assert_eq!(status, StatusCode::OK);

    let marketplaces = body.as_array().unwrap();
    assert_eq!(marketplaces.len(), 6);
    assert_eq!(marketplaces[0]["id"], "ebay");

    let alt = marketplaces.iter().find(|m| m["id"] == "alt").unwrap();
    assert_eq!(alt["available"], false);
    assert_eq!(alt["requiresAuth"], true);
}

#[tokio::test]
async fn test_saved_search_lifecycle() {
    let storage = Arc::new(MemoryStorage::new());
    let app = app_with_storage(storage.clone());

    let (status, saved) = send(
        &app,
        post_json(
            "/api/saved-searches",
            json!({ "player": "Michael Jordan", "year": "1986", "cardNumber": "57" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["name"], "Michael Jordan - 1986");
    let id = saved["id"].as_str().unwrap().to_string();

    let (_, list) = send(&app, get("/api/saved-searches")).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, criteria) = send(&app, get(&format!("/api/saved-searches/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(criteria["cardNumber"], "57");

    // Persisted write-through
    let raw = storage.get("savedSearches").unwrap().unwrap();
    assert!(raw.contains(&id));

    let (status, _) = send(&app, delete(&format!("/api/saved-searches/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get(&format!("/api/saved-searches/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    // Deleting again is not an error
    let (status, _) = send(&app, delete(&format!("/api/saved-searches/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_saved_searches_survive_restart() {
    let storage = Arc::new(MemoryStorage::new());

    let first = app_with_storage(storage.clone());
    send(&first, post_json("/api/saved-searches", json!({ "player": "Tom Brady" }))).await;

    let second = app_with_storage(storage);
    let (_, list) = send(&second, get("/api/saved-searches")).await;
    assert_eq!(list[0]["name"], "Tom Brady - All Years");
}

#[tokio::test]
async fn test_card_search() {
    let app = app();

    let (status, page) = send(&app, get("/api/cards/search?sort=player")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    assert_eq!(page["items"][0]["player"], "LeBron James");

    let (_, page) = send(&app, get("/api/cards/search?player=jordan&page=1")).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["year"], "1986");

    let (status, _) = send(&app, get("/api/cards/search?sort=price")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_grading_estimate() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/grading/estimate",
            json!({
                "centering": 10,
                "corners": 9,
                "edges": 10,
                "surface": 10,
                "cardValue": 2000.0,
                "service": "psa",
                "turnaround": "express"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimatedGrade"], "9.5-10");
    assert_eq!(body["roi"], 27970.0);
    assert_eq!(body["turnaroundDays"], 20);

    let (status, _) = send(
        &app,
        post_json(
            "/api/grading/estimate",
            json!({ "centering": 0, "corners": 5, "edges": 5, "surface": 5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_grading_services() {
    let (status, body) = send(&app(), get("/api/grading/services")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"][0]["name"], "PSA");
    assert_eq!(body["services"][1]["fee"], 35.0);
    assert_eq!(body["turnarounds"][0]["days"], 120);
}

#[tokio::test]
async fn test_extract_photos() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json("/api/photos/extract", json!({ "url": "https://ebay.com/itm/1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"].as_array().unwrap().len(), 4);
    assert_eq!(body["photos"][0]["side"], "front");
    assert_eq!(body["photos"][1]["side"], "back");
    assert_eq!(body["photos"][3]["side"], "back");

    let (status, body) = send(&app, post_json("/api/photos/extract", json!({ "url": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a listing URL");
}

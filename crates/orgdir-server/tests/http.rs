//! HTTP-level tests: the router driven in-process over an in-memory store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use orgdir_core::{Directory, DirectoryError, DirectoryStore, MemoryStore, UnitOfWork};
use orgdir_server::router::build_router;
use orgdir_server::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

// ── Test app builder ───────────────────────────────────────────

fn build_test_app(store: Arc<dyn DirectoryStore>, timeout: Duration) -> axum::Router {
    build_router(AppState::new(Directory::new(store), timeout))
}

fn memory_app() -> axum::Router {
    build_test_app(Arc::new(MemoryStore::new()), Duration::from_secs(5))
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn horns_and_hooves() -> Value {
    json!({
        "address": "Blyukhera 32/1",
        "latitude": 55.7539,
        "longitude": 37.6208,
        "activity_names": [
            {"name": "Food", "sub_activities": [
                {"name": "Meat", "sub_activities": [{"name": "Beef"}]},
                {"name": "Dairy"}
            ]}
        ],
        "organization_name": "Horns and Hooves",
        "phone_numbers": ["2-222-222", "3-333-333"]
    })
}

// ── Stores that misbehave ──────────────────────────────────────

struct BrokenStore;

#[async_trait]
impl DirectoryStore for BrokenStore {
    async fn begin(&self) -> orgdir_core::Result<Box<dyn UnitOfWork>> {
        Err(DirectoryError::Unexpected(
            "connection refused (10.0.0.5:5432)".into(),
        ))
    }
}

struct StalledStore;

#[async_trait]
impl DirectoryStore for StalledStore {
    async fn begin(&self) -> orgdir_core::Result<Box<dyn UnitOfWork>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        MemoryStore::new().begin().await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&memory_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn add_then_lookup_by_name_and_id() {
    let app = memory_app();

    let (status, body) = send(&app, post_json("/add/add_data/", horns_and_hooves())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Data added successfully");

    let (status, body) = send(
        &app,
        get("/organizations/get_by_name?name=Horns%20and%20Hooves"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organization_name"], "Horns and Hooves");
    assert_eq!(body["address"], "Blyukhera 32/1");
    assert_eq!(body["phone_numbers"], json!(["2-222-222", "3-333-333"]));
    assert_eq!(body["latitude"], 55.7539);
    // Read side rebuilds two levels: Beef is not reported.
    assert_eq!(
        body["activity_names"],
        json!([{"name": "Food", "sub_activities": [
            {"name": "Meat", "sub_activities": []},
            {"name": "Dairy", "sub_activities": []}
        ]}])
    );

    let (status, by_id) = send(&app, get("/organizations/get_by_id?org_id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id, body);
}

#[tokio::test]
async fn duplicate_and_too_deep_are_bad_requests() {
    let app = memory_app();
    send(&app, post_json("/add/add_data/", horns_and_hooves())).await;

    let (status, body) = send(&app, post_json("/add/add_data/", horns_and_hooves())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Organization Horns and Hooves already exists");

    let deep = json!({
        "address": "Deep 1", "latitude": 0.0, "longitude": 0.0,
        "organization_name": "Deep",
        "activity_names": [{"name": "a", "sub_activities": [{"name": "b", "sub_activities": [
            {"name": "c", "sub_activities": [{"name": "d", "sub_activities": [{"name": "e"}]}]}
        ]}]}]
    });
    let (status, body) = send(&app, post_json("/add/add_data/", deep)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Exceeded maximum activity nesting level of 3");

    let (status, _) = send(&app, get("/organizations/get_by_name?name=Deep")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_directory_lookups_are_not_found() {
    let app = memory_app();

    let (status, body) = send(&app, get("/organizations/all")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "There are no organizations available");

    let (status, body) = send(
        &app,
        get("/organizations/get_by_address?building_address=Nowhere"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["detail"],
        "There are no organizations placed at this address"
    );

    let (status, body) = send(&app, get("/organizations/get_by_activity?activity=Food")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Activity Food not found");
}

#[tokio::test]
async fn activity_and_address_lookups() {
    let app = memory_app();
    send(&app, post_json("/add/add_data/", horns_and_hooves())).await;

    let (status, body) = send(&app, get("/organizations/get_by_activity?activity=Meat")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        get("/organizations/get_by_address?building_address=Blyukhera%2032%2F1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["organization_name"], "Horns and Hooves");
}

#[tokio::test]
async fn radius_returns_flat_records_or_empty_list() {
    let app = memory_app();
    send(&app, post_json("/add/add_data/", horns_and_hooves())).await;

    let (status, body) = send(
        &app,
        post_json(
            "/organizations/get_by_radius",
            json!({"radius": 1.0, "latitude": 55.75, "longitude": 37.62}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "organization_name": "Horns and Hooves",
            "address": "Blyukhera 32/1",
            "phone_numbers": ["2-222-222", "3-333-333"],
            "latitude": 55.7539,
            "longitude": 37.6208
        }])
    );

    let (status, body) = send(
        &app,
        post_json(
            "/organizations/get_by_radius",
            json!({"radius": -5.0, "latitude": 55.75, "longitude": 37.62}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn internal_errors_are_masked() {
    let app = build_test_app(Arc::new(BrokenStore), Duration::from_secs(5));
    let (status, body) = send(&app, get("/organizations/all")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "internal server error");
}

#[tokio::test]
async fn stalled_store_hits_the_deadline() {
    let app = build_test_app(Arc::new(StalledStore), Duration::from_millis(50));
    let (status, body) = send(&app, post_json("/add/add_data/", horns_and_hooves())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "request deadline exceeded");
}

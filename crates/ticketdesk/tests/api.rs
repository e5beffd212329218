//! HTTP facade tests: each route driven through the router in-process.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ticketdesk::record::{Device, Record};
use ticketdesk::server::{router, AppState, SAVED_MESSAGE};
use ticketdesk::store::{JsonFileStore, MemoryStore, RecordStore};
use ticketdesk::{Error, Result};

const SEED: &[&str] = &["PC", "Laptop", "Printer"];

fn record(id: i64, name: &str, day: u32) -> Record {
    Record {
        id,
        name: name.to_string(),
        division: "Finance".to_string(),
        problem: "No network".to_string(),
        solving: "Replaced cable".to_string(),
        date: Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap(),
        device: "PC".to_string(),
    }
}

fn app_with(store: Box<dyn RecordStore>, require_fields: bool) -> Router {
    router(
        AppState::new(store, require_fields),
        Duration::from_secs(3600),
    )
}

fn app() -> Router {
    app_with(Box::new(MemoryStore::new(SEED)), true)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

/// A store whose every operation fails.
struct BrokenStore;

impl RecordStore for BrokenStore {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    fn list_records(&self) -> Result<Vec<Record>> {
        Err(Error::internal("disk on fire"))
    }

    fn replace_records(&mut self, _records: &[Record]) -> Result<()> {
        Err(Error::internal("disk on fire"))
    }

    fn list_devices(&self) -> Result<Vec<Device>> {
        Err(Error::internal("disk on fire"))
    }
}

#[tokio::test]
async fn test_get_users_starts_empty() {
    let (status, body) = send(&app(), get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    let records: Vec<Record> = serde_json::from_slice(&body).unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_get_devices_returns_seed() {
    let (status, body) = send(&app(), get("/api/devices")).await;
    assert_eq!(status, StatusCode::OK);
    let devices: Vec<Device> = serde_json::from_slice(&body).unwrap();
    let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, SEED);
    assert_eq!(devices[0].id, 1);
}

#[tokio::test]
async fn test_post_users_replaces_collection() {
    let app = app();
    let first = vec![record(1, "Andi", 1), record(2, "Budi", 2)];
    let (status, body) = send(
        &app,
        post_json("/api/users", serde_json::to_vec(&first).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SAVED_MESSAGE.as_bytes());

    let second = vec![record(7, "Citra", 3)];
    send(
        &app,
        post_json("/api/users", serde_json::to_vec(&second).unwrap()),
    )
    .await;

    let (_, body) = send(&app, get("/api/users")).await;
    let records: Vec<Record> = serde_json::from_slice(&body).unwrap();
    assert_eq!(records, second);
}

#[tokio::test]
async fn test_post_users_keeps_client_order() {
    let app = app();
    let records = vec![record(3, "Citra", 3), record(1, "Andi", 1), record(2, "Budi", 2)];
    send(
        &app,
        post_json("/api/users", serde_json::to_vec(&records).unwrap()),
    )
    .await;

    let (_, body) = send(&app, get("/api/users")).await;
    let listed: Vec<Record> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed, records);
}

#[tokio::test]
async fn test_post_users_accepts_browser_dates() {
    let app = app();
    let body = r#"[{"id":1,"name":"Andi","division":"HR","problem":"Printer jam",
        "solving":"Cleared","date":"2024-05-01T08:30:00.000Z","device":"Printer"}]"#;
    let (status, _) = send(&app, post_json("/api/users", body)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_post_users_rejects_blank_required_field() {
    let app = app();
    let mut bad = record(2, "Budi", 2);
    bad.problem = String::new();
    let payload = vec![record(1, "Andi", 1), bad];

    let (status, body) = send(
        &app,
        post_json("/api/users", serde_json::to_vec(&payload).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = String::from_utf8(body).unwrap();
    assert!(message.contains("record 1"));
    assert!(message.contains("problem"));

    // Nothing was written
    let (_, body) = send(&app, get("/api/users")).await;
    let records: Vec<Record> = serde_json::from_slice(&body).unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_post_users_allows_blank_fields_when_not_required() {
    let app = app_with(Box::new(MemoryStore::new(SEED)), false);
    let mut sparse = record(1, "", 1);
    sparse.device = String::new();

    let (status, _) = send(
        &app,
        post_json("/api/users", serde_json::to_vec(&vec![sparse]).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_post_users_rejects_non_array() {
    let (status, _) = send(&app(), post_json("/api/users", r#"{"id": 1}"#)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_post_users_rejects_malformed_json() {
    let (status, _) = send(&app(), post_json("/api/users", "[{")).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_store_failures_map_to_fixed_messages() {
    let app = app_with(Box::new(BrokenStore), true);

    let (status, body) = send(&app, get("/api/users")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Error reading data");

    let (status, body) = send(&app, get("/api/devices")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Error reading devices");

    let (status, body) = send(
        &app,
        post_json("/api/users", serde_json::to_vec(&vec![record(1, "Andi", 1)]).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Error saving data");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/users")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = send(&app(), get("/api/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_json_store_persists_uploads_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let devices = dir.path().join("devices.json");
    let store = JsonFileStore::open(&data, &devices, SEED).unwrap();
    let app = app_with(Box::new(store), true);

    let records = vec![record(1, "Andi", 1)];
    send(
        &app,
        post_json("/api/users", serde_json::to_vec(&records).unwrap()),
    )
    .await;

    let on_disk: Vec<Record> =
        serde_json::from_str(&std::fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(on_disk, records);
}

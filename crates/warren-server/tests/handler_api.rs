//! End-to-end handler tests against in-memory storage.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::util::ServiceExt;
use warren_server::{new_handler, HandlerConfig};
use warren_store::{InMemoryStorage, Storage, StorageEntry, StorageError};

fn app_with(storage: Arc<InMemoryStorage>) -> Router {
    new_handler(HandlerConfig {
        storage,
        request_timeout: Duration::from_secs(5),
    })
}

fn app() -> Router {
    app_with(Arc::new(InMemoryStorage::new()))
}

async fn send(app: Router, method: &str, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn billing_doc() -> String {
    json!({"name": "billing", "toggles": {}}).to_string()
}

#[tokio::test]
async fn test_post_stores_under_name_appended_key() {
    let storage = Arc::new(InMemoryStorage::new());
    let app = app_with(storage.clone());

    let (status, body) = send(app, "POST", "/v1/acme/", &billing_doc()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({}));

    // Key is the trailing-slash-normalized path plus the document name.
    let entry = storage.get("acme/billing").await.unwrap();
    assert_eq!(entry.key, "acme/billing");
}

#[tokio::test]
async fn test_get_round_trip() {
    let storage = Arc::new(InMemoryStorage::new());

    let (status, _) = send(
        app_with(storage.clone()),
        "POST",
        "/v1/acme/",
        &billing_doc(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app_with(storage), "GET", "/v1/acme/billing", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "billing");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_get_root_is_always_rejected() {
    let (status, body) = send(app(), "GET", "/v1/", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "path cannot be \"/\"");

    let (status, _) = send(app(), "GET", "/v1", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_missing_key_is_generic_not_found() {
    let (status, body) = send(app(), "GET", "/v1/ghost", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_get_corrupt_entry_is_generic_500() {
    let storage = Arc::new(InMemoryStorage::new());
    storage
        .put(StorageEntry {
            key: "acme/broken".to_string(),
            value: bytes::Bytes::from_static(b"{ not json"),
        })
        .await
        .unwrap();

    let (status, body) = send(app_with(storage), "GET", "/v1/acme/broken", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Parse detail never leaks to the client.
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_post_empty_body() {
    let (status, body) = send(app(), "POST", "/v1/acme/", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must not be empty");
}

#[tokio::test]
async fn test_post_malformed_body() {
    let (status, body) = send(app(), "POST", "/v1/acme/", "{\"name\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_post_rejects_invalid_toggle_document() {
    let doc = json!({
        "name": "billing",
        "toggles": {
            "retry-count": {"name": "retry-count", "type": "number", "value": "oops"}
        }
    })
    .to_string();

    let (status, body) = send(app(), "POST", "/v1/acme/", &doc).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_delete_missing_key() {
    let (status, body) = send(app(), "DELETE", "/v1/ghost", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn test_delete_then_get() {
    let storage = Arc::new(InMemoryStorage::new());
    send(
        app_with(storage.clone()),
        "POST",
        "/v1/acme/",
        &billing_doc(),
    )
    .await;

    let (status, body) = send(app_with(storage.clone()), "DELETE", "/v1/acme/billing", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, _) = send(app_with(storage), "GET", "/v1/acme/billing", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_immediate_children() {
    let storage = Arc::new(InMemoryStorage::new());
    send(
        app_with(storage.clone()),
        "POST",
        "/v1/acme/",
        &billing_doc(),
    )
    .await;
    send(
        app_with(storage.clone()),
        "POST",
        "/v1/acme/search/",
        &json!({"name": "beta", "toggles": {}}).to_string(),
    )
    .await;

    let (status, body) = send(app_with(storage), "LIST", "/v1/acme", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["billing", "search/"]));
}

#[tokio::test]
async fn test_list_missing_prefix() {
    let (status, body) = send(app(), "LIST", "/v1/ghost", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

/// A backend whose `get` stalls far past any reasonable timeout. The
/// drop guard records whether the call was cancelled mid-flight.
struct StalledStorage {
    cancelled: Arc<AtomicBool>,
    completed: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for StalledStorage {
    async fn get(&self, _path: &str) -> Result<StorageEntry, StorageError> {
        let _guard = DropFlag(self.cancelled.clone());
        tokio::time::sleep(Duration::from_secs(60)).await;
        self.completed.store(true, Ordering::SeqCst);
        Err(StorageError::NotFound)
    }

    async fn put(&self, _entry: StorageEntry) -> Result<(), StorageError> {
        Ok(())
    }

    async fn delete(&self, _path: &str) -> Result<(), StorageError> {
        Err(StorageError::NotFound)
    }

    async fn list(&self, _prefix: &str) -> Result<Vec<String>, StorageError> {
        Err(StorageError::NotFound)
    }
}

#[tokio::test]
async fn test_request_timeout_drops_in_flight_storage_call() {
    let cancelled = Arc::new(AtomicBool::new(false));
    let completed = Arc::new(AtomicBool::new(false));
    let app = new_handler(HandlerConfig {
        storage: Arc::new(StalledStorage {
            cancelled: cancelled.clone(),
            completed: completed.clone(),
        }),
        request_timeout: Duration::from_millis(100),
    });

    let started = Instant::now();
    let (status, _) = send(app, "GET", "/v1/acme/slow", "").await;

    // The response arrives promptly at expiry, long before the backend
    // would have finished.
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(5));

    // The in-flight call was dropped mid-sleep, not awaited to completion.
    assert!(cancelled.load(Ordering::SeqCst));
    assert!(!completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_unknown_method_is_405() {
    let (status, body) = send(app(), "PATCH", "/v1/acme/billing", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method Not Allowed");
}

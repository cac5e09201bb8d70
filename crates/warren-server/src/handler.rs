//! The key-path HTTP API over the storage contract.
//!
//! One mounted prefix (`/v1`); the operation is chosen by HTTP method
//! against the sub-path. Chamber documents travel as opaque JSON bytes
//! between the client and storage; only GET re-parses them (to reject
//! corrupted entries) and POST validates them on the way in.
//!
//! Clients always receive the generic status text in the error field;
//! raw backend and decode detail goes to the logs only.

use crate::config::HandlerConfig;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::any;
use axum::Router;
use serde::Serialize;
use tower_http::timeout::TimeoutLayer;
use tracing::error;
use warren_core::Chamber;
use warren_store::{ensure_trailing_slash, StorageEntry, StorageError};

/// Uniform response envelope; fields are omitted when empty.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the router for the chamber API, wrapped in the hard per-request
/// timeout. On expiry the downstream future is dropped, cancelling any
/// in-flight storage call.
pub fn new_handler(config: HandlerConfig) -> Router {
    let timeout = TimeoutLayer::new(config.request_timeout);
    Router::new()
        .route("/v1", any(handle_root))
        .route("/v1/", any(handle_root))
        .route("/v1/{*path}", any(handle_path))
        .with_state(config)
        .layer(timeout)
}

async fn handle_root(State(config): State<HandlerConfig>, method: Method, body: Bytes) -> Response {
    dispatch(config, method, "/".to_string(), body).await
}

async fn handle_path(
    State(config): State<HandlerConfig>,
    Path(path): Path<String>,
    method: Method,
    body: Bytes,
) -> Response {
    dispatch(config, method, format!("/{}", path), body).await
}

async fn dispatch(config: HandlerConfig, method: Method, path: String, body: Bytes) -> Response {
    match method.as_str() {
        "GET" => get_chamber(config, &path).await,
        "POST" => post_chamber(config, &path, body).await,
        "DELETE" => delete_chamber(config, &path).await,
        "LIST" => list_chambers(config, &path).await,
        _ => respond(
            StatusCode::METHOD_NOT_ALLOWED,
            None,
            status_text(StatusCode::METHOD_NOT_ALLOWED),
        ),
    }
}

async fn get_chamber(config: HandlerConfig, path: &str) -> Response {
    if path == "/" {
        error!(method = "GET", path, "path cannot be the root");
        return respond(
            StatusCode::NOT_FOUND,
            None,
            Some(format!("path cannot be {:?}", path)),
        );
    }

    let entry = match config.storage.get(path).await {
        Ok(entry) => entry,
        Err(err) => {
            error!(method = "GET", path, %err, "storage get failed");
            return respond(StatusCode::NOT_FOUND, None, status_text(StatusCode::NOT_FOUND));
        }
    };

    let chamber = match Chamber::from_slice(&entry.value) {
        Ok(chamber) => chamber,
        Err(err) => {
            error!(method = "GET", path, %err, "stored chamber failed to decode");
            return respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                status_text(StatusCode::INTERNAL_SERVER_ERROR),
            );
        }
    };

    match serde_json::to_value(&chamber) {
        Ok(data) => respond(StatusCode::OK, Some(data), None),
        Err(err) => {
            error!(method = "GET", path, %err, "chamber serialization failed");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                status_text(StatusCode::INTERNAL_SERVER_ERROR),
            )
        }
    }
}

async fn post_chamber(config: HandlerConfig, path: &str, body: Bytes) -> Response {
    if body.is_empty() {
        error!(method = "POST", path, "empty request body");
        return respond(
            StatusCode::BAD_REQUEST,
            None,
            Some("Request body must not be empty".to_string()),
        );
    }

    // Strict decode+validate; the stored bytes are the client's own.
    let chamber = match Chamber::from_slice(&body) {
        Ok(chamber) => chamber,
        Err(err) => {
            error!(method = "POST", path, %err, "request body failed to decode");
            return respond(StatusCode::BAD_REQUEST, None, status_text(StatusCode::BAD_REQUEST));
        }
    };

    let entry = StorageEntry {
        key: ensure_trailing_slash(path) + &chamber.name,
        value: body,
    };
    if let Err(err) = config.storage.put(entry).await {
        error!(method = "POST", path, %err, "storage put failed");
        return respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            status_text(StatusCode::INTERNAL_SERVER_ERROR),
        );
    }

    respond(StatusCode::CREATED, None, None)
}

async fn delete_chamber(config: HandlerConfig, path: &str) -> Response {
    match config.storage.delete(path).await {
        Ok(()) => respond(StatusCode::OK, None, None),
        Err(StorageError::NotFound) => {
            error!(method = "DELETE", path, "key not found");
            respond(StatusCode::NOT_FOUND, None, status_text(StatusCode::NOT_FOUND))
        }
        Err(err) => {
            error!(method = "DELETE", path, %err, "storage delete failed");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                status_text(StatusCode::INTERNAL_SERVER_ERROR),
            )
        }
    }
}

async fn list_chambers(config: HandlerConfig, path: &str) -> Response {
    match config.storage.list(path).await {
        Ok(names) => respond(StatusCode::OK, Some(serde_json::Value::from(names)), None),
        Err(StorageError::NotFound) => {
            error!(method = "LIST", path, "prefix not found");
            respond(StatusCode::NOT_FOUND, None, status_text(StatusCode::NOT_FOUND))
        }
        Err(err) => {
            error!(method = "LIST", path, %err, "storage list failed");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                status_text(StatusCode::INTERNAL_SERVER_ERROR),
            )
        }
    }
}

fn status_text(status: StatusCode) -> Option<String> {
    status.canonical_reason().map(str::to_string)
}

fn respond(status: StatusCode, data: Option<serde_json::Value>, error: Option<String>) -> Response {
    (status, Json(OperationResponse { data, error })).into_response()
}

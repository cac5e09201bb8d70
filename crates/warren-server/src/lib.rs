//! Warren online store: the chamber key-path API served over HTTP.

pub mod config;
pub mod handler;

pub use config::{HandlerConfig, ServerConfig, StorageBackend};
pub use handler::{new_handler, OperationResponse};

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use warren_store::{FileStorage, InMemoryStorage, Storage};

/// Build the configured storage backend.
pub async fn build_storage(backend: &StorageBackend) -> anyhow::Result<Arc<dyn Storage>> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryStorage::new())),
        StorageBackend::File(dir) => Ok(Arc::new(FileStorage::new(dir.clone()).await?)),
    }
}

/// Mount the handler and serve until the process is stopped.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let storage = build_storage(&config.backend).await?;
    info!(backend = ?config.backend, "storage initialized");

    let app = new_handler(HandlerConfig {
        storage,
        request_timeout: config.request_timeout,
    })
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "warren server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

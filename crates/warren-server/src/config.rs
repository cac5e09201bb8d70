//! Server and handler configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use warren_store::Storage;

/// What the HTTP handler needs: the storage seam and the per-request
/// timeout it must enforce. Doubles as the axum router state.
#[derive(Clone)]
pub struct HandlerConfig {
    pub storage: Arc<dyn Storage>,
    pub request_timeout: Duration,
}

/// Which storage backend the server mounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-process map; state is lost on shutdown.
    Memory,
    /// One file per key under the given base directory.
    File(PathBuf),
}

/// Configuration for the online chamber store.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Storage backend behind the key-path API.
    pub backend: StorageBackend,
    /// Hard per-request timeout; expiry drops any in-flight storage call.
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            backend: StorageBackend::Memory,
            request_timeout: Duration::from_secs(10),
        }
    }
}

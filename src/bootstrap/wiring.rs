//! # Dependency Injection
//!
//! ## Responsibilities
//!
//! - ✅ Create the infra adapters (sheet client, stat client, authenticator, storage)
//! - ✅ Inject them into [`cy_app::App`] through the port traits
//!
//! ## Prohibited
//!
//! ❌ **No business logic**. Choosing an adapter from what the configuration
//! says is assembly; deciding what to do with the data is not.
//!
//! > **This is the only place allowed to depend on cy-infra and cy-app simultaneously.**

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use cy_app::{App, AppDeps, AppSettings};
use cy_core::ports::{AuthenticatorPort, KeyValueStorePort};
use cy_core::AppConfig;
use cy_infra::{
    AcceptAllAuthenticator, AppDirs, FileKeyValueStore, HttpAuthenticator, HttpStatsClient,
    MemoryKeyValueStore, SheetStoreClient, SheetStoreConfig, SystemClock, TransientMessageBoard,
};

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(String),
}

pub type WiringResult<T> = Result<T, WiringError>;

/// Where the key-value store lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// `<data_dir>/kv`, survives restarts.
    Persistent,
    /// Process memory; nothing is written to disk.
    Ephemeral,
}

/// The assembled app plus the concrete message board, which the CLI reads
/// to print the current status line.
pub struct WiredApp {
    pub app: App,
    pub messages: Arc<TransientMessageBoard>,
}

fn create_store(config: &AppConfig, mode: StorageMode) -> Arc<dyn KeyValueStorePort> {
    match mode {
        StorageMode::Persistent => {
            let kv_dir = AppDirs::new(config.data_dir.clone()).kv_dir();
            Arc::new(FileKeyValueStore::new(kv_dir))
        }
        StorageMode::Ephemeral => Arc::new(MemoryKeyValueStore::new()),
    }
}

fn create_authenticator(
    config: &AppConfig,
    timeout: Duration,
) -> WiringResult<Arc<dyn AuthenticatorPort>> {
    if config.auth_url.trim().is_empty() {
        info!("no login endpoint configured, accepting any complete credentials");
        return Ok(Arc::new(AcceptAllAuthenticator));
    }
    let auth = HttpAuthenticator::new(config.auth_url.clone(), timeout)
        .map_err(|e| WiringError::HttpClientInit(e.to_string()))?;
    Ok(Arc::new(auth))
}

pub fn wire_app(config: &AppConfig, mode: StorageMode) -> WiringResult<WiredApp> {
    let timeout = Duration::from_secs(config.http_timeout_secs);
    let message_ttl = Duration::from_secs(config.message_ttl_secs);
    let messages = Arc::new(TransientMessageBoard::new());

    if config.sheet_url.trim().is_empty() {
        warn!("sheet url not configured; fetches will come back empty and writes will fail");
    }
    let sheet = SheetStoreClient::new(
        SheetStoreConfig {
            url: config.sheet_url.clone(),
            timeout,
            message_ttl,
        },
        messages.clone(),
    )
    .map_err(|e| WiringError::HttpClientInit(e.to_string()))?;

    let stats = HttpStatsClient::new(
        config.followers_url.clone(),
        config.visitors_url.clone(),
        timeout,
    )
    .map_err(|e| WiringError::HttpClientInit(e.to_string()))?;

    let deps = AppDeps {
        remote: Arc::new(sheet),
        stats: Arc::new(stats),
        auth: create_authenticator(config, timeout)?,
        store: create_store(config, mode),
        notifier: messages.clone(),
        clock: Arc::new(SystemClock),
    };

    Ok(WiredApp {
        app: App::new(deps, AppSettings { message_ttl }),
        messages,
    })
}

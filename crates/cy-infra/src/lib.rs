//! Adapters behind the `cy-core` ports: the sheet client, stat and login
//! endpoints, the on-device key-value store, the transient message board and
//! the system clock.

pub mod app_dirs;
pub mod auth;
pub mod http;
pub mod notify;
pub mod remote;
pub mod stats;
pub mod storage;
pub mod time;

pub use app_dirs::AppDirs;
pub use auth::{AcceptAllAuthenticator, HttpAuthenticator};
pub use notify::TransientMessageBoard;
pub use remote::{SheetStoreClient, SheetStoreConfig};
pub use stats::HttpStatsClient;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use time::SystemClock;

//! Process bootstrap: configuration, tracing and port wiring.

pub mod config;
pub mod tracing;
pub mod wiring;

pub use self::config::{load_config, resolve_config};
pub use self::tracing::init_tracing_subscriber;
pub use self::wiring::{wire_app, StorageMode, WiredApp, WiringError};

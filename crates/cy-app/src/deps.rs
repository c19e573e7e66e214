//! # Application Dependencies
//!
//! Dependency grouping for [`crate::App`] construction.
//!
//! **Note**: This is NOT a Builder pattern.
//! - No build steps
//! - No default values
//! - Just parameter grouping

use std::sync::Arc;

use cy_core::ports::{
    AuthenticatorPort, ClockPort, KeyValueStorePort, NotifierPort, RemoteStorePort, StatsPort,
};

/// All dependencies are required; there are no optional fields.
pub struct AppDeps {
    // Sheet and stat endpoints
    pub remote: Arc<dyn RemoteStorePort>,
    pub stats: Arc<dyn StatsPort>,
    pub auth: Arc<dyn AuthenticatorPort>,

    // Device
    pub store: Arc<dyn KeyValueStorePort>,
    pub notifier: Arc<dyn NotifierPort>,
    pub clock: Arc<dyn ClockPort>,
}

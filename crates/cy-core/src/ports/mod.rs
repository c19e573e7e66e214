//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `cy-app` and the
//! adapters in `cy-infra`. The core never talks to the network or the disk
//! directly; it only sees these traits.

mod auth;
mod clock;
pub mod errors;
mod kv_store;
mod notifier;
mod remote_store;
mod stats;

pub use auth::{AuthError, AuthenticatorPort};
pub use clock::ClockPort;
pub use errors::StorageError;
pub use kv_store::KeyValueStorePort;
pub use notifier::NotifierPort;
pub use remote_store::{RemoteStoreError, RemoteStorePort};
pub use stats::{StatsError, StatsPort, VisitorStats};

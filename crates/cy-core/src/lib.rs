//! # cy-core
//!
//! Core domain models and board logic for the CodeYatri dashboard.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! entity shapes, status-keyed boards, the row normalizer, the reconciler and
//! the port traits implemented by `cy-infra`.

pub mod board;
pub mod config;
pub mod ids;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod ports;
pub mod reconcile;

// Re-export commonly used types at the crate root
pub use board::{Board, BoardItem, BucketKey};
pub use config::AppConfig;
pub use ids::LocalIdGenerator;
pub use metrics::{Channel, Metrics};
pub use model::{
    Credentials, Event, EventStatus, Phase, Priority, Project, ProjectStatus, RawRow,
    ResourceKind,
};
pub use reconcile::{reconcile, relocate};

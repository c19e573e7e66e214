pub mod hydrate_events;
pub mod hydrate_projects;
pub mod refresh_metrics;

pub use hydrate_events::HydrateEvents;
pub use hydrate_projects::HydrateProjects;
pub use refresh_metrics::RefreshMetrics;

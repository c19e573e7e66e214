//! Application layer of the CodeYatri dashboard.
//!
//! [`App`] owns the shared board state and wires the mutation dispatcher,
//! the hydration use cases and the session gate to the ports in [`AppDeps`].

pub mod cache;
pub mod deps;
pub mod dispatcher;
pub mod lifecycle;
pub mod session;
pub mod state;
pub mod usecases;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use cy_core::{Channel, LocalIdGenerator, Metrics};

pub use cache::EventCache;
pub use deps::AppDeps;
pub use dispatcher::{Applied, MutationDispatcher, PendingSync, ProjectMove};
pub use lifecycle::Liveness;
pub use session::{SessionError, SessionGate};
pub use state::{DashboardState, StateHandle, ViewStatus};
pub use usecases::{HydrateEvents, HydrateProjects, RefreshMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    /// Lifetime of sync warnings on the status line.
    pub message_ttl: Duration,
}

/// What a mount pass produced. `None` entries were discarded by teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountReport {
    pub projects: Option<usize>,
    pub events: Option<usize>,
}

pub struct App {
    state: StateHandle,
    liveness: Liveness,
    dispatcher: MutationDispatcher,
    session: SessionGate,
    hydrate_projects: HydrateProjects,
    hydrate_events: HydrateEvents,
    refresh_metrics: RefreshMetrics,
}

impl App {
    /// Builds the app and restores the cached event board.
    pub fn new(deps: AppDeps, settings: AppSettings) -> Self {
        let cache = EventCache::new(Arc::clone(&deps.store));
        let state = StateHandle::default();
        let restored = cache.load();
        info!(events = restored.len(), "restored cached events");
        state.update(|s| s.events = restored);

        let ids = Arc::new(LocalIdGenerator::new(Arc::clone(&deps.clock)));
        let liveness = Liveness::new();

        let dispatcher = MutationDispatcher::new(
            state.clone(),
            Arc::clone(&deps.remote),
            Arc::clone(&deps.notifier),
            cache.clone(),
            Arc::clone(&ids),
            settings.message_ttl,
        );
        let hydrate_projects = HydrateProjects::from_ports(
            Arc::clone(&deps.remote),
            Arc::clone(&deps.notifier),
            Arc::clone(&ids),
            state.clone(),
            liveness.clone(),
        );
        let hydrate_events = HydrateEvents::from_ports(
            Arc::clone(&deps.remote),
            Arc::clone(&deps.notifier),
            ids,
            cache,
            state.clone(),
            liveness.clone(),
        );
        let refresh_metrics =
            RefreshMetrics::from_ports(Arc::clone(&deps.stats), state.clone(), liveness.clone());
        let session = SessionGate::new(deps.auth, deps.store);

        Self {
            state,
            liveness,
            dispatcher,
            session,
            hydrate_projects,
            hydrate_events,
            refresh_metrics,
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn dispatcher(&self) -> &MutationDispatcher {
        &self.dispatcher
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    /// Runs both hydrations and the metrics refresh concurrently.
    #[tracing::instrument(name = "app.mount", skip(self))]
    pub async fn mount(&self) -> MountReport {
        let (projects, events, _) = tokio::join!(
            self.hydrate_projects.execute(),
            self.hydrate_events.execute(),
            self.refresh_metrics.execute(),
        );
        MountReport { projects, events }
    }

    pub async fn hydrate_projects(&self) -> Option<usize> {
        self.hydrate_projects.execute().await
    }

    pub async fn hydrate_events(&self) -> Option<usize> {
        self.hydrate_events.execute().await
    }

    pub async fn refresh_metrics(&self) -> Metrics {
        self.refresh_metrics.execute().await
    }

    /// Discards the results of any hydration still in flight.
    pub fn teardown(&self) {
        self.liveness.teardown();
    }

    /// One manual step up or down. Local only.
    pub fn adjust_metric(&self, channel: Channel, up: bool) -> u64 {
        self.state.update(|s| {
            if up {
                s.metrics.increment(channel)
            } else {
                s.metrics.decrement(channel)
            }
        })
    }
}

use std::sync::Arc;

use tracing::{debug, info};

use cy_core::normalize::bucketize;
use cy_core::ports::{NotifierPort, RemoteStorePort};
use cy_core::{Board, LocalIdGenerator, Project, ResourceKind};

use crate::lifecycle::Liveness;
use crate::state::StateHandle;

pub const MSG_LOADING_PROJECTS: &str = "Loading projects from Sheet...";
pub const MSG_PROJECTS_FAILED: &str = "Failed to load projects from Sheet.";

/// Loads the project board from the sheet and replaces local state with it.
pub struct HydrateProjects {
    remote: Arc<dyn RemoteStorePort>,
    notifier: Arc<dyn NotifierPort>,
    ids: Arc<LocalIdGenerator>,
    state: StateHandle,
    liveness: Liveness,
}

impl HydrateProjects {
    pub fn from_ports(
        remote: Arc<dyn RemoteStorePort>,
        notifier: Arc<dyn NotifierPort>,
        ids: Arc<LocalIdGenerator>,
        state: StateHandle,
        liveness: Liveness,
    ) -> Self {
        Self {
            remote,
            notifier,
            ids,
            state,
            liveness,
        }
    }

    /// Number of projects on the board afterwards, or `None` when torn down
    /// before the fetch completed.
    #[tracing::instrument(name = "usecase.hydrate_projects.execute", skip(self))]
    pub async fn execute(&self) -> Option<usize> {
        self.state.update(|s| {
            s.view.loading = true;
            s.view.fetch_error = None;
        });
        self.notifier.show(MSG_LOADING_PROJECTS);

        let rows = self.remote.fetch_rows(ResourceKind::Projects).await;
        if !self.liveness.is_alive() {
            debug!(rows = rows.len(), "torn down, discarding projects");
            return None;
        }

        let fresh: Board<Project> = bucketize(&rows, &self.ids);
        let count = fresh.len();
        // Rows that came back but could not be placed anywhere.
        let unusable = !rows.is_empty() && fresh.is_empty();

        self.state.update(|s| {
            s.projects = fresh;
            s.view.loading = false;
            if unusable {
                s.view.fetch_error = Some(MSG_PROJECTS_FAILED.to_string());
            }
        });
        self.notifier.dismiss(MSG_LOADING_PROJECTS);

        info!(rows = rows.len(), projects = count, "projects hydrated");
        Some(count)
    }
}

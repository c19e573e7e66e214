//! Optimistic mutations.
//!
//! Every operation changes the in-memory boards first, then hands the write
//! to a spawned task and returns a [`PendingSync`]. A failed write leaves the
//! local change in place and flashes a warning; nothing is rolled back.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use cy_core::ports::{NotifierPort, RemoteStorePort};
use cy_core::{
    relocate, BoardItem, Event, EventStatus, LocalIdGenerator, Project, ProjectStatus, ResourceKind,
};

use crate::cache::EventCache;
use crate::state::StateHandle;

/// Outcome of a background write.
///
/// Dropping it detaches the write; awaiting [`PendingSync::wait`] yields
/// whether the remote store accepted it.
#[must_use = "dropping a PendingSync detaches the write; call `wait` to observe the outcome"]
pub struct PendingSync {
    inner: Inner,
}

enum Inner {
    Settled(bool),
    Running(JoinHandle<bool>),
}

impl PendingSync {
    fn settled(ok: bool) -> Self {
        Self {
            inner: Inner::Settled(ok),
        }
    }

    /// `true` when no write was needed.
    pub fn is_noop(&self) -> bool {
        matches!(self.inner, Inner::Settled(true))
    }

    pub async fn wait(self) -> bool {
        match self.inner {
            Inner::Settled(ok) => ok,
            Inner::Running(handle) => match handle.await {
                Ok(ok) => ok,
                Err(err) => {
                    error!(error = %err, "sync task did not complete");
                    false
                }
            },
        }
    }
}

/// Locally applied item and its pending write.
pub struct Applied<T> {
    pub item: T,
    pub sync: PendingSync,
}

pub struct ProjectMove {
    pub sync: PendingSync,
    /// Set when the project just landed in `completed`.
    pub celebrate: bool,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Create,
    Edit,
    Move,
    Delete,
}

fn warning_for(kind: ResourceKind, action: Action) -> String {
    let noun = kind.singular();
    match action {
        Action::Create => format!("Warning: failed to sync new {noun} to Sheet."),
        Action::Edit => format!("Warning: failed to sync {noun} edit to Sheet."),
        Action::Move => format!("Warning: failed to sync {noun} move to Sheet."),
        Action::Delete => format!("Warning: failed to delete {noun} from Sheet."),
    }
}

pub struct MutationDispatcher {
    state: StateHandle,
    remote: Arc<dyn RemoteStorePort>,
    notifier: Arc<dyn NotifierPort>,
    cache: EventCache,
    ids: Arc<LocalIdGenerator>,
    warning_ttl: Duration,
}

impl MutationDispatcher {
    pub fn new(
        state: StateHandle,
        remote: Arc<dyn RemoteStorePort>,
        notifier: Arc<dyn NotifierPort>,
        cache: EventCache,
        ids: Arc<LocalIdGenerator>,
        warning_ttl: Duration,
    ) -> Self {
        Self {
            state,
            remote,
            notifier,
            cache,
            ids,
            warning_ttl,
        }
    }

    fn ensure_id<T: BoardItem>(&self, item: &mut T) {
        let trimmed = item.id().trim().to_string();
        if trimmed.is_empty() {
            item.set_id(self.ids.next_id());
        } else if trimmed != item.id() {
            item.set_id(trimmed);
        }
    }

    fn spawn_sync<F>(&self, kind: ResourceKind, action: Action, write: F) -> PendingSync
    where
        F: Future<Output = bool> + Send + 'static,
    {
        let warning = warning_for(kind, action);
        let Ok(runtime) = Handle::try_current() else {
            error!(%kind, ?action, "no async runtime for sync task");
            self.notifier.flash(&warning, self.warning_ttl);
            return PendingSync::settled(false);
        };

        let notifier = Arc::clone(&self.notifier);
        let ttl = self.warning_ttl;
        let handle = runtime.spawn(async move {
            let ok = write.await;
            if ok {
                debug!(%kind, ?action, "synced to sheet");
            } else {
                warn!(%kind, ?action, "sheet sync failed, keeping local change");
                notifier.flash(&warning, ttl);
            }
            ok
        });
        PendingSync {
            inner: Inner::Running(handle),
        }
    }

    fn persist<T: BoardItem>(&self, item: &T, action: Action) -> PendingSync {
        let kind = T::KIND;
        let record: Value = match serde_json::to_value(item) {
            Ok(record) => record,
            Err(err) => {
                error!(%kind, error = %err, "record encode failed");
                self.notifier.flash(&warning_for(kind, action), self.warning_ttl);
                return PendingSync::settled(false);
            }
        };
        let remote = Arc::clone(&self.remote);
        self.spawn_sync(kind, action, async move { remote.persist_row(kind, &record).await })
    }

    fn remove_remote(&self, kind: ResourceKind, id: String) -> PendingSync {
        let remote = Arc::clone(&self.remote);
        self.spawn_sync(kind, Action::Delete, async move {
            remote.delete_row(kind, &id).await
        })
    }

    // ---- projects ----

    #[tracing::instrument(name = "dispatcher.create_project", skip_all)]
    pub fn create_project(&self, mut project: Project) -> Applied<Project> {
        self.ensure_id(&mut project);
        self.state.update(|s| s.projects.upsert(project.clone()));
        info!(id = %project.id, status = %project.status, "project created");
        let sync = self.persist(&project, Action::Create);
        Applied { item: project, sync }
    }

    #[tracing::instrument(name = "dispatcher.edit_project", skip_all, fields(id = %project.id))]
    pub fn edit_project(&self, mut project: Project) -> Applied<Project> {
        self.ensure_id(&mut project);
        self.state.update(|s| s.projects.upsert(project.clone()));
        let sync = self.persist(&project, Action::Edit);
        Applied { item: project, sync }
    }

    #[tracing::instrument(name = "dispatcher.delete_project", skip(self))]
    pub fn delete_project(&self, id: &str) -> PendingSync {
        let id = id.trim().to_string();
        let removed = self.state.update(|s| s.projects.remove_everywhere(&id));
        debug!(found = removed.is_some(), "project removed locally");
        self.remove_remote(ResourceKind::Projects, id)
    }

    #[tracing::instrument(
        name = "dispatcher.move_project",
        skip(self, project),
        fields(id = %project.id)
    )]
    pub fn move_project(
        &self,
        project: Project,
        source: ProjectStatus,
        target: ProjectStatus,
    ) -> ProjectMove {
        if source == target {
            return ProjectMove {
                sync: PendingSync::settled(true),
                celebrate: false,
            };
        }
        let moved = self.state.update(|s| relocate(&mut s.projects, project, target));
        let celebrate = target == ProjectStatus::Completed;
        if celebrate {
            info!(id = %moved.id, "project completed");
        }
        ProjectMove {
            sync: self.persist(&moved, Action::Move),
            celebrate,
        }
    }

    // ---- events ----

    #[tracing::instrument(name = "dispatcher.create_event", skip_all)]
    pub fn create_event(&self, mut event: Event) -> Applied<Event> {
        self.ensure_id(&mut event);
        self.state.update(|s| {
            s.events.upsert(event.clone());
            self.cache.save(&s.events);
        });
        info!(id = %event.id, status = %event.status, "event created");
        let sync = self.persist(&event, Action::Create);
        Applied { item: event, sync }
    }

    #[tracing::instrument(name = "dispatcher.edit_event", skip_all, fields(id = %event.id))]
    pub fn edit_event(&self, mut event: Event) -> Applied<Event> {
        self.ensure_id(&mut event);
        self.state.update(|s| {
            s.events.upsert(event.clone());
            self.cache.save(&s.events);
        });
        let sync = self.persist(&event, Action::Edit);
        Applied { item: event, sync }
    }

    #[tracing::instrument(name = "dispatcher.delete_event", skip(self))]
    pub fn delete_event(&self, id: &str) -> PendingSync {
        let id = id.trim().to_string();
        self.state.update(|s| {
            s.events.remove_everywhere(&id);
            self.cache.save(&s.events);
        });
        self.remove_remote(ResourceKind::Events, id)
    }

    #[tracing::instrument(
        name = "dispatcher.move_event",
        skip(self, event),
        fields(id = %event.id)
    )]
    pub fn move_event(
        &self,
        event: Event,
        source: EventStatus,
        target: EventStatus,
    ) -> PendingSync {
        if source == target {
            return PendingSync::settled(true);
        }
        let moved = self.state.update(|s| {
            let moved = relocate(&mut s.events, event, target);
            self.cache.save(&s.events);
            moved
        });
        self.persist(&moved, Action::Move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixed_ids, MockRemote};
    use cy_core::{Board, BucketKey};
    use cy_infra::{MemoryKeyValueStore, TransientMessageBoard};
    use serde_json::json;

    struct Fixture {
        state: StateHandle,
        board: Arc<TransientMessageBoard>,
        cache: EventCache,
        dispatcher: MutationDispatcher,
    }

    fn fixture(remote: MockRemote) -> Fixture {
        let state = StateHandle::default();
        let board = Arc::new(TransientMessageBoard::new());
        let cache = EventCache::new(Arc::new(MemoryKeyValueStore::new()));
        let dispatcher = MutationDispatcher::new(
            state.clone(),
            Arc::new(remote),
            board.clone(),
            cache.clone(),
            fixed_ids(1_700_000_000_000),
            Duration::from_secs(4),
        );
        Fixture {
            state,
            board,
            cache,
            dispatcher,
        }
    }

    fn failing_remote() -> MockRemote {
        let mut remote = MockRemote::new();
        remote.expect_fetch_rows().returning(|_| Vec::new());
        remote.expect_persist_row().returning(|_, _| false);
        remote.expect_delete_row().returning(|_, _| false);
        remote
    }

    #[tokio::test]
    async fn create_assigns_id_and_persists_record() {
        let mut remote = MockRemote::new();
        remote
            .expect_persist_row()
            .withf(|kind, record| {
                *kind == ResourceKind::Projects
                    && record["id"] == json!("1700000000000")
                    && record["status"] == json!("active")
            })
            .times(1)
            .returning(|_, _| true);
        let fx = fixture(remote);

        let applied = fx
            .dispatcher
            .create_project(Project::new("Atlas", ProjectStatus::Active));

        assert_eq!(applied.item.id, "1700000000000");
        assert!(fx.state.read(|s| s.projects.contains_id("1700000000000")));
        assert!(applied.sync.wait().await);
        assert_eq!(fx.board.current(), None);
    }

    #[tokio::test]
    async fn create_with_existing_id_replaces_stale_copy() {
        let mut remote = MockRemote::new();
        remote.expect_persist_row().returning(|_, _| true);
        let fx = fixture(remote);
        fx.state.update(|s| {
            s.projects
                .upsert(Project::new("Old", ProjectStatus::Paused).with_id("p1"))
        });

        let applied = fx
            .dispatcher
            .create_project(Project::new("New", ProjectStatus::Planning).with_id(" p1 "));

        let projects = fx.state.read(|s| s.projects.clone());
        assert_eq!(applied.item.id, "p1");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects.bucket(ProjectStatus::Planning)[0].title, "New");
        applied.sync.wait().await;
    }

    #[tokio::test]
    async fn local_changes_survive_a_dead_network() {
        let fx = fixture(failing_remote());

        let event = Event::new("Hack Night", "2025-07-04", EventStatus::Upcoming).with_id("e1");
        let created = fx.dispatcher.create_event(event);
        assert!(!created.sync.wait().await);

        let moved = fx.dispatcher.move_event(
            created.item.clone(),
            EventStatus::Upcoming,
            EventStatus::ThisWeek,
        );
        assert!(!moved.wait().await);

        let mut edited = created.item.clone();
        edited.status = EventStatus::ThisWeek;
        edited.title = "Hack Night v2".into();
        assert!(!fx.dispatcher.edit_event(edited).sync.wait().await);

        let events = fx.state.read(|s| s.events.clone());
        assert!(events.is_consistent());
        assert_eq!(events.bucket(EventStatus::ThisWeek)[0].title, "Hack Night v2");
        assert!(events.bucket(EventStatus::Upcoming).is_empty());
        assert_eq!(
            fx.board.current().as_deref(),
            Some("Warning: failed to sync event edit to Sheet.")
        );

        assert!(!fx.dispatcher.delete_event("e1").wait().await);
        assert!(fx.state.read(|s| s.events.is_empty()));
        assert_eq!(
            fx.board.current().as_deref(),
            Some("Warning: failed to delete event from Sheet.")
        );
    }

    #[tokio::test]
    async fn move_to_same_bucket_is_a_noop() {
        let mut remote = MockRemote::new();
        remote.expect_persist_row().times(0);
        let fx = fixture(remote);
        let project = Project::new("Atlas", ProjectStatus::Active).with_id("p1");
        fx.state.update(|s| s.projects.upsert(project.clone()));

        let outcome = fx
            .dispatcher
            .move_project(project, ProjectStatus::Active, ProjectStatus::Active);

        assert!(outcome.sync.is_noop());
        assert!(!outcome.celebrate);
        assert!(outcome.sync.wait().await);
    }

    #[tokio::test]
    async fn completing_a_project_celebrates() {
        let mut remote = MockRemote::new();
        remote
            .expect_persist_row()
            .withf(|_, record| record["status"] == json!("completed"))
            .times(1)
            .returning(|_, _| false);
        let fx = fixture(remote);
        let project = Project::new("Atlas", ProjectStatus::Active).with_id("p1");
        fx.state.update(|s| s.projects.upsert(project.clone()));

        let outcome = fx
            .dispatcher
            .move_project(project, ProjectStatus::Active, ProjectStatus::Completed);

        assert!(outcome.celebrate);
        assert!(!outcome.sync.wait().await);
        assert_eq!(
            fx.state.read(|s| s.projects.locate("p1")),
            Some(ProjectStatus::Completed)
        );
        assert_eq!(
            fx.board.current().as_deref(),
            Some("Warning: failed to sync project move to Sheet.")
        );
    }

    #[tokio::test]
    async fn delete_sends_trimmed_id_even_when_missing_locally() {
        let mut remote = MockRemote::new();
        remote
            .expect_delete_row()
            .withf(|kind, id| *kind == ResourceKind::Projects && id.to_string() == "p9")
            .times(1)
            .returning(|_, _| true);
        let fx = fixture(remote);

        assert!(fx.dispatcher.delete_project(" p9 ").wait().await);
    }

    #[tokio::test]
    async fn every_event_change_reaches_the_cache() {
        let fx = fixture(failing_remote());

        let a = fx
            .dispatcher
            .create_event(Event::new("A", "2025-01-01", EventStatus::Upcoming).with_id("a"));
        let b = fx
            .dispatcher
            .create_event(Event::new("B", "2025-01-02", EventStatus::Upcoming).with_id("b"));
        let moved = fx
            .dispatcher
            .move_event(a.item, EventStatus::Upcoming, EventStatus::Completed);
        let deleted = fx.dispatcher.delete_event("b");

        for sync in [a.sync, b.sync, moved, deleted] {
            sync.wait().await;
        }

        let cached = fx.cache.load();
        assert_eq!(cached, fx.state.read(|s| s.events.clone()));
        assert_eq!(cached.locate("a"), Some(EventStatus::Completed));
        assert!(!cached.contains_id("b"));
    }

    #[tokio::test]
    async fn bucket_invariants_hold_after_every_operation() {
        let fx = fixture(failing_remote());
        let mut pending = Vec::new();
        let statuses = ProjectStatus::ALL;

        for i in 0..12usize {
            let id = format!("p{}", i % 5);
            let status = statuses[i % statuses.len()];
            let project = Project::new(format!("project {i}"), status).with_id(id.clone());
            match i % 4 {
                0 => pending.push(fx.dispatcher.create_project(project).sync),
                1 => pending.push(fx.dispatcher.edit_project(project).sync),
                2 => {
                    let source = fx.state.read(|s| s.projects.locate(&id)).unwrap_or(status);
                    let target = statuses[(i + 1) % statuses.len()];
                    pending.push(fx.dispatcher.move_project(project, source, target).sync);
                }
                _ => pending.push(fx.dispatcher.delete_project(&id)),
            }
            let projects: Board<Project> = fx.state.read(|s| s.projects.clone());
            assert!(projects.is_consistent(), "after op {i}: {projects:?}");
        }

        for sync in pending {
            sync.wait().await;
        }
    }

    #[test]
    fn without_runtime_sync_fails_but_local_change_applies() {
        let mut remote = MockRemote::new();
        remote.expect_persist_row().times(0);
        let fx = fixture(remote);

        let applied = fx
            .dispatcher
            .create_project(Project::new("Offline", ProjectStatus::Planning).with_id("p1"));

        assert!(!applied.sync.is_noop());
        assert!(fx.state.read(|s| s.projects.contains_id("p1")));
        assert_eq!(
            fx.board.current().as_deref(),
            Some("Warning: failed to sync new project to Sheet.")
        );
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use cy_core::normalize::{bucketize, MappedRow, EVENT_FIELDS};
use cy_core::ports::{NotifierPort, RemoteStorePort};
use cy_core::{reconcile, Board, BoardItem, Event, LocalIdGenerator, RawRow, ResourceKind};

use crate::cache::EventCache;
use crate::lifecycle::Liveness;
use crate::state::StateHandle;

pub const MSG_LOADING_EVENTS: &str = "Loading events from Sheet...";
pub const MSG_EVENTS_FAILED: &str = "Failed to load events from Sheet.";

/// Loads the event board from the sheet and merges it into local state.
///
/// Local events, including those restored from the cache, are kept as they
/// are; only ids the board has not seen yet are added.
pub struct HydrateEvents {
    remote: Arc<dyn RemoteStorePort>,
    notifier: Arc<dyn NotifierPort>,
    ids: Arc<LocalIdGenerator>,
    cache: EventCache,
    state: StateHandle,
    liveness: Liveness,
}

impl HydrateEvents {
    pub fn from_ports(
        remote: Arc<dyn RemoteStorePort>,
        notifier: Arc<dyn NotifierPort>,
        ids: Arc<LocalIdGenerator>,
        cache: EventCache,
        state: StateHandle,
        liveness: Liveness,
    ) -> Self {
        Self {
            remote,
            notifier,
            ids,
            cache,
            state,
            liveness,
        }
    }

    #[tracing::instrument(name = "usecase.hydrate_events.execute", skip(self))]
    pub async fn execute(&self) -> Option<usize> {
        self.state.update(|s| {
            s.view.loading = true;
            s.view.fetch_error = None;
        });
        self.notifier.show(MSG_LOADING_EVENTS);

        let rows = self.remote.fetch_rows(ResourceKind::Events).await;
        if !self.liveness.is_alive() {
            debug!(rows = rows.len(), "torn down, discarding events");
            return None;
        }

        let fresh: Board<Event> = bucketize(&rows, &self.ids);
        let unusable = !rows.is_empty() && fresh.is_empty();
        let sheet_ids = sheet_ids(&rows);

        let (before, after) = self.state.update(|s| {
            let before = s.events.len();
            let fresh = drop_known_idless(fresh, &s.events, &sheet_ids);
            s.events = reconcile(&s.events, &fresh);
            s.view.loading = false;
            if unusable {
                s.view.fetch_error = Some(MSG_EVENTS_FAILED.to_string());
            }
            self.cache.save(&s.events);
            (before, s.events.len())
        });
        self.notifier.dismiss(MSG_LOADING_EVENTS);

        info!(rows = rows.len(), added = after - before, events = after, "events hydrated");
        Some(after)
    }
}

/// Ids the sheet itself assigned. Anything else in a fresh board was generated.
fn sheet_ids(rows: &[RawRow]) -> HashSet<String> {
    rows.iter()
        .map(|row| MappedRow::new(row, EVENT_FIELDS).get("id").trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

fn same_content(a: &Event, b: &Event) -> bool {
    a.title == b.title
        && a.date == b.date
        && a.description == b.description
        && a.eventtype == b.eventtype
        && a.participants == b.participants
}

/// Id-less sheet rows get a new id on every fetch; skip those the board
/// already holds under an earlier generated id.
fn drop_known_idless(
    fresh: Board<Event>,
    existing: &Board<Event>,
    sheet_ids: &HashSet<String>,
) -> Board<Event> {
    let kept: Vec<Event> = fresh
        .items()
        .filter(|event| {
            sheet_ids.contains(event.id())
                || !existing.items().any(|known| same_content(known, event))
        })
        .cloned()
        .collect();
    Board::from_items(kept)
}

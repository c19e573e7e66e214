//! In-memory dashboard state shared by the dispatcher and the use cases.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use cy_core::{Board, Event, Metrics, Project};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewStatus {
    pub loading: bool,
    pub fetch_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub projects: Board<Project>,
    pub events: Board<Event>,
    pub metrics: Metrics,
    pub view: ViewStatus,
}

/// Cloneable handle on the shared state.
///
/// The lock is only ever held inside [`StateHandle::update`] and
/// [`StateHandle::read`], never across an `.await`.
#[derive(Clone, Default)]
pub struct StateHandle {
    inner: Arc<Mutex<DashboardState>>,
}

impl StateHandle {
    pub fn new(initial: DashboardState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> DashboardState {
        self.lock().clone()
    }
}

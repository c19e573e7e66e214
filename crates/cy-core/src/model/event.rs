use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{BoardItem, BucketKey};
use crate::model::ResourceKind;

/// Column of the event board.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Upcoming,
    ThisWeek,
    Completed,
    Cancelled,
}

impl BucketKey for EventStatus {
    const ALL: &'static [Self] = &[
        Self::Upcoming,
        Self::ThisWeek,
        Self::Completed,
        Self::Cancelled,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::ThisWeek => "this_week",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A community event. `date` is kept as the sheet's calendar date string
/// (usually `YYYY-MM-DD`) and compared verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub status: EventStatus,
    pub eventtype: String,
    pub participants: String,
}

impl Event {
    pub fn new(title: impl Into<String>, date: impl Into<String>, status: EventStatus) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            status,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl BoardItem for Event {
    type Status = EventStatus;
    const KIND: ResourceKind = ResourceKind::Events;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn status(&self) -> EventStatus {
        self.status
    }

    fn set_status(&mut self, status: EventStatus) {
        self.status = status;
    }
}

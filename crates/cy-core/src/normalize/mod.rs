//! Raw sheet rows → typed board items.

pub mod field_map;

use crate::board::{Board, BoardItem, BucketKey};
use crate::ids::LocalIdGenerator;
use crate::model::{Event, EventStatus, Phase, Priority, Project, ProjectStatus, RawRow};

pub use field_map::{resolve, FieldSpec, MappedRow, EVENT_FIELDS, PROJECT_FIELDS};

/// Typed construction from a raw row.
pub trait FromRow: BoardItem {
    /// `None` when the row cannot be placed on the board (unknown status).
    fn from_row(row: &RawRow, ids: &LocalIdGenerator) -> Option<Self>;
}

fn resolve_id(mapped: &MappedRow<'_>, ids: &LocalIdGenerator) -> String {
    let id = mapped.get("id").trim().to_string();
    if id.is_empty() {
        ids.next_id()
    } else {
        id
    }
}

impl FromRow for Project {
    fn from_row(row: &RawRow, ids: &LocalIdGenerator) -> Option<Self> {
        let mapped = MappedRow::new(row, PROJECT_FIELDS);
        let status = ProjectStatus::parse(&mapped.get("status"))?;

        Some(Self {
            id: resolve_id(&mapped, ids),
            title: mapped.get("title"),
            lead: mapped.get("lead"),
            priority: Priority::parse(&mapped.get("priority")).unwrap_or_default(),
            description: mapped.get("description"),
            status,
            phase: Phase::parse(&mapped.get("phase")).unwrap_or_default(),
            githubrepo: mapped.get("githubrepo"),
            phone: mapped.get("phone"),
        })
    }
}

impl FromRow for Event {
    fn from_row(row: &RawRow, ids: &LocalIdGenerator) -> Option<Self> {
        let mapped = MappedRow::new(row, EVENT_FIELDS);
        let status = EventStatus::parse(&mapped.get("status"))?;

        Some(Self {
            id: resolve_id(&mapped, ids),
            title: mapped.get("title"),
            description: mapped.get("description"),
            date: mapped.get("date"),
            status,
            eventtype: mapped.get("eventtype"),
            participants: mapped.get("participants"),
        })
    }
}

/// Normalizes `rows` in order and buckets them by status.
///
/// Rows with an unknown status are dropped; when two rows share an id the
/// first one wins.
pub fn bucketize<T: FromRow>(rows: &[RawRow], ids: &LocalIdGenerator) -> Board<T> {
    let mut board = Board::new();
    let mut dropped = 0usize;
    for row in rows {
        match T::from_row(row, ids) {
            Some(item) => {
                if !board.push_unique(item) {
                    dropped += 1;
                }
            }
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        let kind = T::KIND;
        tracing::debug!(
            kind = %kind,
            dropped,
            kept = board.len(),
            "rows dropped during normalization"
        );
    }
    board
}

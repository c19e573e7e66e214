//! Declarative column mapping.
//!
//! Sheets drift: the same column shows up as `id` or `ID`, a title as `name`.
//! Each canonical field lists the source columns it accepts, in priority order.

use serde_json::Value;

use crate::model::RawRow;

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
    pub default: &'static str,
}

const fn field_spec(
    field: &'static str,
    aliases: &'static [&'static str],
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        field,
        aliases,
        default,
    }
}

pub const PROJECT_FIELDS: &[FieldSpec] = &[
    field_spec("id", &["id", "ID"], ""),
    field_spec("title", &["title", "name", "Title"], ""),
    field_spec("lead", &["lead", "Leader", "leadName"], ""),
    field_spec("priority", &["priority"], "medium"),
    field_spec("description", &["description"], ""),
    field_spec("status", &["status"], "planning"),
    field_spec("phase", &["phase"], "MVP"),
    field_spec("githubrepo", &["githubrepo", "github"], ""),
    field_spec("phone", &["phone"], ""),
];

pub const EVENT_FIELDS: &[FieldSpec] = &[
    field_spec("id", &["id", "ID"], ""),
    field_spec("title", &["title"], ""),
    field_spec("description", &["description"], ""),
    field_spec("date", &["date"], ""),
    field_spec("status", &["status"], "upcoming"),
    field_spec("eventtype", &["eventtype", "type", "eventType"], ""),
    field_spec(
        "participants",
        &["participants", "participant", "expectedParticipants"],
        "",
    ),
];

/// Text of a cell, or `None` when the cell counts as empty.
///
/// Empty strings, `0`, `false` and `null` are empty; numbers are rendered
/// the way the sheet displays them.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// First non-empty value among `aliases`.
pub fn resolve(row: &RawRow, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| row.get(*alias).and_then(cell_text))
}

/// View of one raw row through a mapping table.
pub struct MappedRow<'a> {
    row: &'a RawRow,
    table: &'static [FieldSpec],
}

impl<'a> MappedRow<'a> {
    pub fn new(row: &'a RawRow, table: &'static [FieldSpec]) -> Self {
        Self { row, table }
    }

    /// Resolved value of canonical `field`, falling back to its default.
    /// Fields missing from the table resolve to an empty string.
    pub fn get(&self, field: &str) -> String {
        match self.table.iter().find(|entry| entry.field == field) {
            Some(entry) => {
                resolve(self.row, entry.aliases).unwrap_or_else(|| entry.default.to_string())
            }
            None => String::new(),
        }
    }
}

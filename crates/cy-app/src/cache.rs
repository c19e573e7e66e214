//! On-device copy of the event board.

use std::sync::Arc;

use tracing::{debug, warn};

use cy_core::ports::KeyValueStorePort;
use cy_core::{Board, Event};

pub const EVENTS_CACHE_KEY: &str = "cy_events_v1";

/// Persists the event board as one JSON document.
///
/// Storage and decoding failures are logged and never reach the caller: a
/// broken cache only means starting from an empty board.
#[derive(Clone)]
pub struct EventCache {
    store: Arc<dyn KeyValueStorePort>,
}

impl EventCache {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Board<Event> {
        let raw = match self.store.get(EVENTS_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Board::new(),
            Err(err) => {
                warn!(error = %err, "event cache read failed");
                return Board::new();
            }
        };

        let value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "event cache is not valid JSON");
                return Board::new();
            }
        };

        match Board::from_json_value(value) {
            Some(board) => {
                debug!(events = board.len(), "restored event cache");
                board
            }
            None => {
                warn!("event cache is not a status mapping");
                Board::new()
            }
        }
    }

    pub fn save(&self, board: &Board<Event>) {
        let encoded = match serde_json::to_string(board) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(error = %err, "event cache encode failed");
                return;
            }
        };
        if let Err(err) = self.store.set(EVENTS_CACHE_KEY, &encoded) {
            warn!(error = %err, "event cache write failed");
        }
    }
}

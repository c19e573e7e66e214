//! Status-keyed boards.
//!
//! A [`Board`] maps every status of an entity to the ordered list of items in
//! that column. Two invariants hold for every board built through this API:
//!
//! - an item's `status` equals the key of the bucket that holds it;
//! - an id appears at most once across all buckets.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::model::{Event, EventStatus, ResourceKind};

/// Status enum usable as a bucket key.
pub trait BucketKey: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every bucket, in display order.
    const ALL: &'static [Self];

    /// Wire name, also used as the serialized map key.
    fn as_str(self) -> &'static str;

    /// Trims and lower-cases `raw` before matching against the wire names.
    fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        Self::ALL.iter().copied().find(|key| key.as_str() == wanted)
    }
}

/// An entity that lives on a board.
pub trait BoardItem:
    Clone + fmt::Debug + PartialEq + serde::Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Status: BucketKey;

    /// Which sheet resource stores this entity.
    const KIND: ResourceKind;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);
}

#[derive(Clone, PartialEq)]
pub struct Board<T: BoardItem> {
    buckets: BTreeMap<T::Status, Vec<T>>,
}

impl<T: BoardItem> Board<T> {
    /// Board with every bucket present and empty.
    pub fn new() -> Self {
        Self {
            buckets: T::Status::ALL.iter().map(|key| (*key, Vec::new())).collect(),
        }
    }

    /// Builds a board from items in order. Later duplicates of an id are dropped.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut board = Self::new();
        for item in items {
            board.push_unique(item);
        }
        board
    }

    pub fn bucket(&self, status: T::Status) -> &[T] {
        self.buckets.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> impl Iterator<Item = (T::Status, &[T])> {
        self.buckets.iter().map(|(key, items)| (*key, items.as_slice()))
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.buckets.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.items().any(|item| item.id() == id)
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items().find(|item| item.id() == id)
    }

    /// Bucket currently holding `id`.
    pub fn locate(&self, id: &str) -> Option<T::Status> {
        self.buckets()
            .find(|(_, items)| items.iter().any(|item| item.id() == id))
            .map(|(key, _)| key)
    }

    /// Appends `item` to the bucket of its status unless its id is already on the board.
    pub fn push_unique(&mut self, item: T) -> bool {
        if self.contains_id(item.id()) {
            return false;
        }
        self.buckets.entry(item.status()).or_default().push(item);
        true
    }

    /// Removes every copy of `id` from every bucket and returns the first one found.
    pub fn remove_everywhere(&mut self, id: &str) -> Option<T> {
        let mut removed = None;
        for items in self.buckets.values_mut() {
            if let Some(pos) = items.iter().position(|item| item.id() == id) {
                let item = items.remove(pos);
                removed.get_or_insert(item);
                items.retain(|item| item.id() != id);
            }
        }
        removed
    }

    /// Replaces any item with the same id and appends `item` to the bucket of its status.
    pub fn upsert(&mut self, item: T) {
        self.remove_everywhere(item.id());
        self.buckets.entry(item.status()).or_default().push(item);
    }

    /// `true` when both board invariants hold.
    pub fn is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.buckets.iter().all(|(key, items)| {
            items
                .iter()
                .all(|item| item.status() == *key && seen.insert(item.id().to_string()))
        })
    }

    /// Lenient decode of a JSON object keyed by bucket name.
    ///
    /// Returns `None` when `value` is not an object. Unknown bucket keys and
    /// items that fail to deserialize are skipped, and every surviving item is
    /// forced onto the status of the bucket it was stored under.
    pub fn from_json_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };

        let mut board = Self::new();
        for (key, items) in map {
            let Some(status) = T::Status::parse(&key) else {
                tracing::debug!(bucket = %key, "skipping unknown bucket");
                continue;
            };
            let Value::Array(items) = items else {
                continue;
            };
            for raw in items {
                match serde_json::from_value::<T>(raw) {
                    Ok(mut item) => {
                        item.set_status(status);
                        board.push_unique(item);
                    }
                    Err(err) => {
                        tracing::debug!(bucket = %key, error = %err, "skipping malformed item")
                    }
                }
            }
        }
        Some(board)
    }
}

impl<T: BoardItem> Default for Board<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BoardItem> fmt::Debug for Board<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.buckets.iter().map(|(key, items)| (key.as_str(), items)))
            .finish()
    }
}

impl<T: BoardItem> Serialize for Board<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, items) in &self.buckets {
            map.serialize_entry(key.as_str(), items)?;
        }
        map.end()
    }
}

impl Board<Event> {
    /// Every event scheduled on `date`, paired with the bucket holding it.
    pub fn events_on(&self, date: &str) -> Vec<(EventStatus, &Event)> {
        self.buckets()
            .flat_map(|(status, items)| {
                items
                    .iter()
                    .filter(move |event| event.date == date)
                    .map(move |event| (status, event))
            })
            .collect()
    }
}

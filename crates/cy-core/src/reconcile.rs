//! Merging fetched boards into local ones.

use crate::board::{Board, BoardItem, BucketKey};

/// Additive, identity-deduplicating merge.
///
/// Each bucket of the result starts as a copy of `existing`; items of the
/// matching `fresh` bucket are appended in fetch order unless their id is
/// already anywhere on the growing result. Local items are never removed or
/// overwritten, so a locally moved item keeps its local bucket.
pub fn reconcile<T: BoardItem>(existing: &Board<T>, fresh: &Board<T>) -> Board<T> {
    let mut merged = existing.clone();
    for status in T::Status::ALL {
        for item in fresh.bucket(*status) {
            merged.push_unique(item.clone());
        }
    }
    merged
}

/// Re-buckets `item` under `target`, dropping every other copy of its id.
/// Returns the stored item.
pub fn relocate<T: BoardItem>(board: &mut Board<T>, mut item: T, target: T::Status) -> T {
    item.set_status(target);
    board.upsert(item.clone());
    item
}

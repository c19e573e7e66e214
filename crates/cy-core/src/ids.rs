//! Locally generated identities.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::ports::ClockPort;

/// Hands out timestamp-based ids for items the sheet has not assigned one to.
///
/// Ids are the current epoch milliseconds, bumped by one when two ids are
/// requested within the same millisecond, so they stay unique per process.
pub struct LocalIdGenerator {
    clock: Arc<dyn ClockPort>,
    last: AtomicI64,
}

impl LocalIdGenerator {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            clock,
            last: AtomicI64::new(i64::MIN),
        }
    }

    pub fn next_id(&self) -> String {
        let now = self.clock.now_ms();
        let mut prev = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = if prev == i64::MIN { now } else { now.max(prev + 1) };
            match self
                .last
                .compare_exchange(prev, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}

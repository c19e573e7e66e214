use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "still mounted" flag.
///
/// In-flight hydration checks it before touching state; after
/// [`Liveness::teardown`] late results are dropped.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

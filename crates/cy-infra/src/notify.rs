//! Single-slot status line with self-expiring messages.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use cy_core::ports::NotifierPort;

#[derive(Default)]
struct Slot {
    message: Option<String>,
    /// Bumped on every write; a pending expiry only clears its own message.
    seq: u64,
    timer: Option<AbortHandle>,
}

impl Slot {
    fn replace(&mut self, message: Option<String>) -> u64 {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.seq = self.seq.wrapping_add(1);
        self.message = message;
        self.seq
    }
}

#[derive(Clone, Default)]
pub struct TransientMessageBoard {
    slot: Arc<Mutex<Slot>>,
}

impl TransientMessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Message currently on display.
    pub fn current(&self) -> Option<String> {
        self.lock().message.clone()
    }
}

impl NotifierPort for TransientMessageBoard {
    fn flash(&self, message: &str, ttl: Duration) {
        let mut slot = self.lock();
        let seq = slot.replace(Some(message.to_string()));

        // Outside a runtime the message simply stays until replaced.
        let Ok(runtime) = Handle::try_current() else {
            debug!("no runtime for message expiry");
            return;
        };
        // The countdown starts now, not when the task is first polled.
        let deadline = Instant::now() + ttl;
        let shared = Arc::clone(&self.slot);
        let task = runtime.spawn(async move {
            sleep_until(deadline).await;
            let mut slot = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.seq == seq {
                slot.message = None;
                slot.timer = None;
            }
        });
        slot.timer = Some(task.abort_handle());
    }

    fn show(&self, message: &str) {
        self.lock().replace(Some(message.to_string()));
    }

    fn dismiss(&self, message: &str) {
        let mut slot = self.lock();
        if slot.message.as_deref() == Some(message) {
            slot.replace(None);
        }
    }

    fn clear(&self) {
        self.lock().replace(None);
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Website visitor totals reported by the visitor tracker.
///
/// `total` is absent when the tracker answered without a usable count; the
/// weekly figure defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorStats {
    pub total: Option<u64>,
    pub weekly: u64,
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stat endpoint not configured")]
    NotConfigured,

    #[error("stat request failed: {0}")]
    Transport(String),

    #[error("stat endpoint returned status {0}")]
    Status(u16),

    #[error("unexpected stat payload: {0}")]
    Payload(String),
}

/// Read-only stat endpoints consulted once at mount time.
#[async_trait]
pub trait StatsPort: Send + Sync {
    async fn follower_count(&self) -> Result<u64, StatsError>;
    async fn visitor_stats(&self) -> Result<VisitorStats, StatsError>;
}

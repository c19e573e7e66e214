use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::model::{RawRow, ResourceKind};

/// Why a call against the remote sheet did not produce a usable result.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    #[error("invalid sheet url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("sheet returned status {0}")]
    Status(u16),

    #[error("sheet did not acknowledge the update")]
    Rejected,

    #[error("sheet returned no usable data")]
    NoUsableData,
}

/// The spreadsheet-backed system of record.
///
/// Implementations never surface errors to callers: a failed fetch is an empty
/// row list and a failed write is `false`. Diagnostics are the adapter's job.
#[async_trait]
pub trait RemoteStorePort: Send + Sync {
    async fn fetch_rows(&self, kind: ResourceKind) -> Vec<RawRow>;

    /// Upserts `record` by its `id` field.
    async fn persist_row(&self, kind: ResourceKind, record: &Value) -> bool;

    async fn delete_row(&self, kind: ResourceKind, id: &str) -> bool;
}

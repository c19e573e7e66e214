use thiserror::Error;

/// Failure of the on-device key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

use super::errors::StorageError;

/// On-device string key-value storage (the dashboard's `localStorage`).
///
/// Calls are synchronous: they are issued from inside local state updates and
/// must complete before the update returns.
pub trait KeyValueStorePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

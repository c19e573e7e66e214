use std::time::Duration;

/// Non-blocking, user-facing status line.
pub trait NotifierPort: Send + Sync {
    /// Shows `message` and clears it after `ttl` unless a newer message replaced it.
    fn flash(&self, message: &str, ttl: Duration);

    /// Shows `message` until it is replaced or cleared.
    fn show(&self, message: &str);

    /// Clears the line only while it still shows `message`.
    fn dismiss(&self, message: &str);

    fn clear(&self);
}

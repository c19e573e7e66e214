use async_trait::async_trait;
use thiserror::Error;

use crate::model::Credentials;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Carries the server's explanation when it gave one.
    #[error("{0}")]
    Rejected(String),

    #[error("authentication request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait AuthenticatorPort: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError>;
}

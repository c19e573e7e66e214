//! Login gate in front of the dashboard.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use cy_core::ports::{AuthError, AuthenticatorPort, KeyValueStorePort, StorageError};
use cy_core::Credentials;

pub const SESSION_KEY: &str = "isAuthenticated";
pub const MSG_MISSING_CREDENTIALS: &str = "Please enter username and password";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter username and password")]
    MissingCredentials,

    #[error("{0}")]
    Rejected(String),

    #[error("Failed to connect to auth server: {0}")]
    Unavailable(String),

    #[error("could not persist session: {0}")]
    Storage(#[from] StorageError),
}

pub struct SessionGate {
    auth: Arc<dyn AuthenticatorPort>,
    store: Arc<dyn KeyValueStorePort>,
}

impl SessionGate {
    pub fn new(auth: Arc<dyn AuthenticatorPort>, store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { auth, store }
    }

    #[tracing::instrument(
        name = "session.login",
        skip_all,
        fields(username = %credentials.username)
    )]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        if !credentials.is_complete() {
            return Err(SessionError::MissingCredentials);
        }

        self.auth.authenticate(credentials).await.map_err(|err| match err {
            AuthError::Rejected(reason) => SessionError::Rejected(reason),
            AuthError::Transport(reason) => SessionError::Unavailable(reason),
        })?;

        self.store.set(SESSION_KEY, "true")?;
        info!("session opened");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(SESSION_KEY)?;
        info!("session closed");
        Ok(())
    }

    /// Unreadable storage counts as logged out.
    pub fn is_authenticated(&self) -> bool {
        match self.store.get(SESSION_KEY) {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(err) => {
                warn!(error = %err, "session flag unreadable");
                false
            }
        }
    }
}

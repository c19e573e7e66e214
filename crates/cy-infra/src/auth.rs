//! Login adapters.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use cy_core::ports::{AuthError, AuthenticatorPort};
use cy_core::Credentials;

use crate::http::build_http_client;

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Accepts any complete credential pair. Used when no login endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAllAuthenticator;

#[async_trait]
impl AuthenticatorPort for AcceptAllAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if credentials.is_complete() {
            Ok(())
        } else {
            Err(AuthError::Rejected(MSG_INVALID_CREDENTIALS.to_string()))
        }
    }
}

/// Posts `{username, password}` to a login endpoint.
///
/// Accepted only on a 2xx answer whose body says `success: true` or
/// `authenticated: true`. Otherwise the body's `message` or `error` becomes
/// the rejection text.
pub struct HttpAuthenticator {
    http: reqwest::Client,
    url: String,
}

impl HttpAuthenticator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            url: url.into(),
        })
    }
}

fn rejection_text(body: &Value) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(MSG_INVALID_CREDENTIALS)
        .to_string()
}

#[async_trait]
impl AuthenticatorPort for HttpAuthenticator {
    #[tracing::instrument(
        name = "infra.auth.authenticate",
        skip_all,
        fields(username = %credentials.username)
    )]
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({
                "username": credentials.username,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);

        let confirmed = ["success", "authenticated"]
            .iter()
            .any(|key| body.get(*key).and_then(Value::as_bool) == Some(true));
        if status.is_success() && confirmed {
            info!("login accepted");
            return Ok(());
        }

        warn!(%status, "login rejected");
        Err(AuthError::Rejected(rejection_text(&body)))
    }
}

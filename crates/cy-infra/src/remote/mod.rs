//! Spreadsheet-backed remote store.
//!
//! The sheet is an uncontrolled third-party script endpoint: method support
//! and response shape vary, so every call is defensive. Fallible `try_*`
//! methods carry a [`RemoteStoreError`]; the [`RemoteStorePort`] impl logs it
//! and flattens it to an empty list or `false`.

pub mod decode;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Url};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use cy_core::ports::{NotifierPort, RemoteStoreError, RemoteStorePort};
use cy_core::{RawRow, ResourceKind};

use crate::http::build_http_client;

type RemoteResult<T> = std::result::Result<T, RemoteStoreError>;

pub const MSG_NO_USABLE_DATA: &str = "Sheet returned no usable data.";
pub const MSG_FETCH_FAILED: &str = "Failed to fetch from Sheet (see logs).";

#[derive(Debug, Clone)]
pub struct SheetStoreConfig {
    pub url: String,
    pub timeout: Duration,
    /// Lifetime of the status message shown when a fetch fails.
    pub message_ttl: Duration,
}

pub struct SheetStoreClient {
    http: reqwest::Client,
    base_url: String,
    notifier: Arc<dyn NotifierPort>,
    message_ttl: Duration,
}

impl SheetStoreClient {
    pub fn new(config: SheetStoreConfig, notifier: Arc<dyn NotifierPort>) -> anyhow::Result<Self> {
        let http = build_http_client(config.timeout)?;
        Ok(Self::with_client(http, config, notifier))
    }

    pub fn with_client(
        http: reqwest::Client,
        config: SheetStoreConfig,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            http,
            base_url: config.url,
            notifier,
            message_ttl: config.message_ttl,
        }
    }

    /// Sheet URL with `params` appended to whatever query it already carries.
    fn endpoint(&self, params: &[(&str, &str)]) -> RemoteResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RemoteStoreError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Update URL for the GET fallback. `data` is percent-encoded (`%20`, not `+`).
    fn update_fallback_url(&self, kind: ResourceKind, record: &Value) -> RemoteResult<Url> {
        let mut url = self.endpoint(&[("type", kind.as_str()), ("action", "update")])?;
        let data = urlencoding::encode(&record.to_string()).into_owned();
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&data={data}"),
            _ => format!("data={data}"),
        };
        url.set_query(Some(&query));
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteStoreError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteStoreError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn body_text(response: reqwest::Response) -> RemoteResult<String> {
        response
            .text()
            .await
            .map_err(|e| RemoteStoreError::Transport(format!("read body failed: {e}")))
    }

    /// `GET ?type=<kind>&action=get`, decoded into rows.
    pub async fn try_fetch_rows(&self, kind: ResourceKind) -> RemoteResult<Vec<RawRow>> {
        let url = self.endpoint(&[("type", kind.as_str()), ("action", "get")])?;
        debug!(%url, "fetching sheet rows");

        let response = self
            .send(self.http.get(url).header(header::CACHE_CONTROL, "no-cache"))
            .await?;
        let text = Self::body_text(response).await?;
        decode::decode_rows(&text).ok_or(RemoteStoreError::NoUsableData)
    }

    /// `POST ?type=<kind>&action=update` with the record as JSON body.
    ///
    /// Accepted only when the body acknowledges the write with
    /// `success: true` or a non-empty `results` value.
    pub async fn try_post_update(&self, kind: ResourceKind, record: &Value) -> RemoteResult<()> {
        let url = self.endpoint(&[("type", kind.as_str()), ("action", "update")])?;
        let response = self.send(self.http.post(url).json(record)).await?;
        let text = Self::body_text(response).await?;

        let body = decode::ResponseBody::parse(&text);
        let acknowledged = body.json().is_some_and(|json| {
            json.get("success").and_then(Value::as_bool) == Some(true)
                || json.get("results").is_some_and(is_truthy)
        });
        if acknowledged {
            Ok(())
        } else {
            Err(RemoteStoreError::Rejected)
        }
    }

    /// `GET ?type=<kind>&action=update&data=<json>`; any OK status counts.
    pub async fn try_get_update(&self, kind: ResourceKind, record: &Value) -> RemoteResult<()> {
        let url = self.update_fallback_url(kind, record)?;
        self.send(self.http.get(url)).await.map(|_| ())
    }

    /// `GET ?type=<kind>&action=delete&id=<id>`
    pub async fn try_delete_row(&self, kind: ResourceKind, id: &str) -> RemoteResult<()> {
        let url = self.endpoint(&[("type", kind.as_str()), ("action", "delete"), ("id", id)])?;
        self.send(self.http.get(url)).await.map(|_| ())
    }
}

/// `null`, `false`, `0` and `""` do not acknowledge anything.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[async_trait]
impl RemoteStorePort for SheetStoreClient {
    #[tracing::instrument(name = "infra.sheet.fetch_rows", skip(self), fields(kind = %kind))]
    async fn fetch_rows(&self, kind: ResourceKind) -> Vec<RawRow> {
        match self.try_fetch_rows(kind).await {
            Ok(rows) => {
                info!(rows = rows.len(), "fetched sheet rows");
                rows
            }
            Err(RemoteStoreError::NoUsableData) => {
                warn!("sheet returned no usable data");
                self.notifier.flash(MSG_NO_USABLE_DATA, self.message_ttl);
                Vec::new()
            }
            Err(err) => {
                error!(error = %err, "sheet fetch failed");
                self.notifier.flash(MSG_FETCH_FAILED, self.message_ttl);
                Vec::new()
            }
        }
    }

    #[tracing::instrument(
        name = "infra.sheet.persist_row",
        skip(self, record),
        fields(kind = %kind)
    )]
    async fn persist_row(&self, kind: ResourceKind, record: &Value) -> bool {
        let post_err = match self.try_post_update(kind, record).await {
            Ok(()) => return true,
            Err(err) => err,
        };
        debug!(error = %post_err, "POST update not accepted, retrying as GET");

        match self.try_get_update(kind, record).await {
            Ok(()) => true,
            Err(err) => {
                warn!(post_error = %post_err, get_error = %err, "sheet update failed");
                false
            }
        }
    }

    #[tracing::instrument(name = "infra.sheet.delete_row", skip(self), fields(kind = %kind))]
    async fn delete_row(&self, kind: ResourceKind, id: &str) -> bool {
        match self.try_delete_row(kind, id.trim()).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "sheet delete failed");
                false
            }
        }
    }
}

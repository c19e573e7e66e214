//! Follower and visitor stat endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use cy_core::ports::{StatsError, StatsPort, VisitorStats};

use crate::http::build_http_client;

/// Keys that may carry the follower count, most specific first.
const FOLLOWER_KEYS: &[&str] = &["code.yatri", "followers", "count", "instagram"];
const VISITOR_TOTAL_KEYS: &[&str] = &["total", "total_visitors"];

/// Non-negative integer from a JSON number or numeric string.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => {
            let s = s.trim().replace(',', "");
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            })
        }
        _ => None,
    }
}

pub fn parse_follower_count(body: &Value) -> Option<u64> {
    match body {
        Value::Object(map) => FOLLOWER_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(as_count),
        other => as_count(other),
    }
}

pub fn parse_visitor_stats(body: &Value) -> Option<VisitorStats> {
    let map = body.as_object()?;
    Some(VisitorStats {
        total: VISITOR_TOTAL_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(as_count),
        weekly: map.get("weekly").and_then(as_count).unwrap_or(0),
    })
}

pub struct HttpStatsClient {
    http: reqwest::Client,
    followers_url: String,
    visitors_url: String,
}

impl HttpStatsClient {
    pub fn new(
        followers_url: impl Into<String>,
        visitors_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            followers_url: followers_url.into(),
            visitors_url: visitors_url.into(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value, StatsError> {
        if url.trim().is_empty() {
            return Err(StatsError::NotConfigured);
        }
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StatsError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| StatsError::Payload(e.to_string()))
    }
}

#[async_trait]
impl StatsPort for HttpStatsClient {
    #[tracing::instrument(name = "infra.stats.followers", skip(self))]
    async fn follower_count(&self) -> Result<u64, StatsError> {
        let body = self.get_json(&self.followers_url).await?;
        debug!(%body, "follower payload");
        parse_follower_count(&body).ok_or_else(|| StatsError::Payload(body.to_string()))
    }

    #[tracing::instrument(name = "infra.stats.visitors", skip(self))]
    async fn visitor_stats(&self) -> Result<VisitorStats, StatsError> {
        let body = self.get_json(&self.visitors_url).await?;
        parse_visitor_stats(&body).ok_or_else(|| StatsError::Payload(body.to_string()))
    }
}

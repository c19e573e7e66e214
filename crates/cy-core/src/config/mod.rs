//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - ✅ Define configuration data structures
//! - ✅ Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! ❌ **No business logic or policies**
//! ❌ **No validation logic**
//!
//! ## Iron Rule
//!
//! > **This module contains data only.** An empty URL is a fact (the endpoint
//! > is not configured), not an error. Deciding what to do about it belongs to
//! > the adapters.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Spreadsheet endpoint serving both projects and events
    pub sheet_url: String,

    /// Follower-count endpoint (may be empty)
    pub followers_url: String,

    /// Visitor-stats endpoint (may be empty)
    pub visitors_url: String,

    /// Login endpoint; empty means any complete credential pair is accepted
    pub auth_url: String,

    /// Directory holding the key-value store and logs
    pub data_dir: PathBuf,

    /// Lifetime of transient status messages
    pub message_ttl_secs: u64,

    /// Per-request HTTP timeout
    pub http_timeout_secs: u64,
}

fn str_at(toml_value: &toml::Value, section: &str, key: &str) -> String {
    toml_value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn int_at(toml_value: &toml::Value, section: &str, key: &str) -> u64 {
    toml_value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or(0)
        .max(0) as u64
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation or default
    /// value logic. Missing keys become empty strings and zeroes.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            sheet_url: str_at(toml_value, "sheet", "url"),
            followers_url: str_at(toml_value, "stats", "followers_url"),
            visitors_url: str_at(toml_value, "stats", "visitors_url"),
            auth_url: str_at(toml_value, "auth", "url"),
            data_dir: PathBuf::from(str_at(toml_value, "storage", "data_dir")),
            message_ttl_secs: int_at(toml_value, "ui", "message_ttl_secs"),
            http_timeout_secs: int_at(toml_value, "http", "timeout_secs"),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            sheet_url: String::new(),
            followers_url: String::new(),
            visitors_url: String::new(),
            auth_url: String::new(),
            data_dir: PathBuf::new(),
            message_ttl_secs: 0,
            http_timeout_secs: 0,
        }
    }

    /// Create AppConfig with system-default values for production use
    ///
    /// **Note**: The base directory should be computed by the caller using
    /// platform-specific logic (e.g., the `dirs` crate). Endpoints stay empty.
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            message_ttl_secs: 4,
            http_timeout_secs: 15,
            ..Self::empty()
        }
    }
}

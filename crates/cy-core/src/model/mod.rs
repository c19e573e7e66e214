//! Entity shapes stored on the dashboard boards.

mod event;
mod project;

pub use event::{Event, EventStatus};
pub use project::{Phase, Priority, Project, ProjectStatus};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Untyped record as returned by the remote sheet, one entry per column.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// The two resource kinds the remote sheet exposes via its `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Projects,
    Events,
}

impl ResourceKind {
    /// Value of the `type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Events => "events",
        }
    }

    /// Singular noun used in user-facing messages.
    pub fn singular(self) -> &'static str {
        match self {
            Self::Projects => "project",
            Self::Events => "event",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username/password pair submitted at the login boundary.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves present. Whitespace-only values count as present.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

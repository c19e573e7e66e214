use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{BoardItem, BucketKey};
use crate::model::ResourceKind;

/// Lifecycle state of a project. Doubles as its bucket on the project board.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    #[default]
    Planning,
    Completed,
    Paused,
}

impl BucketKey for ProjectStatus {
    const ALL: &'static [Self] = &[Self::Active, Self::Planning, Self::Completed, Self::Paused];

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Planning => "planning",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Best-effort coercion; anything unrecognized is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match squash(raw).as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Delivery phase shown on project cards.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Phase {
    #[default]
    #[serde(rename = "MVP")]
    Mvp,
    ProductResearch,
    ResearchPaper,
    ReadytoLaunch,
}

impl Phase {
    /// Accepts `"MVP"`, `"Product Research"`, `"ready-to-launch"` and similar spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match squash(raw).as_str() {
            "mvp" => Some(Self::Mvp),
            "productresearch" => Some(Self::ProductResearch),
            "researchpaper" => Some(Self::ResearchPaper),
            "readytolaunch" => Some(Self::ReadytoLaunch),
            _ => None,
        }
    }
}

fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub lead: String,
    pub priority: Priority,
    pub description: String,
    pub status: ProjectStatus,
    pub phase: Phase,
    pub githubrepo: String,
    pub phone: String,
}

impl Project {
    pub fn new(title: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            title: title.into(),
            status,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl BoardItem for Project {
    type Status = ProjectStatus;
    const KIND: ResourceKind = ResourceKind::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }

    fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_trimmed_and_case_insensitive() {
        assert_eq!(ProjectStatus::parse(" Active "), Some(ProjectStatus::Active));
        assert_eq!(ProjectStatus::parse("PAUSED"), Some(ProjectStatus::Paused));
        assert_eq!(ProjectStatus::parse("archived"), None);
    }

    #[test]
    fn phase_accepts_loose_spellings() {
        assert_eq!(Phase::parse("MVP"), Some(Phase::Mvp));
        assert_eq!(Phase::parse("Product Research"), Some(Phase::ProductResearch));
        assert_eq!(Phase::parse("ready-to-launch"), Some(Phase::ReadytoLaunch));
        assert_eq!(Phase::parse("beta"), None);
    }

    #[test]
    fn serializes_with_sheet_column_names() {
        let project = Project::new("Site", ProjectStatus::Active).with_id("7");
        let value = serde_json::to_value(&project).unwrap();

        assert_eq!(value["id"], "7");
        assert_eq!(value["status"], "active");
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["phase"], "MVP");
        assert_eq!(value["githubrepo"], "");
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let project: Project = serde_json::from_str(r#"{"id":"1","title":"x"}"#).unwrap();
        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.priority, Priority::Medium);
        assert_eq!(project.phase, Phase::Mvp);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Project lifecycle status. Stored as text, parsed back exhaustively so
/// an unrecognized value can never fall through a comparison silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn parse(raw: &str) -> Option<ProjectStatus> {
        match raw {
            "planned" => Some(ProjectStatus::Planned),
            "in_progress" => Some(ProjectStatus::InProgress),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

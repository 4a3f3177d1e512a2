//! Maintenance Issue Model

use serde::{Deserialize, Serialize};

/// Issue lifecycle status
///
/// Forward-only: `Reported -> InProgress -> Resolved`, plus `Reported -> Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    Reported,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Resolved,
}

impl IssueStatus {
    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(self, next: IssueStatus) -> bool {
        matches!(
            (self, next),
            (IssueStatus::Reported, IssueStatus::InProgress)
                | (IssueStatus::Reported, IssueStatus::Resolved)
                | (IssueStatus::InProgress, IssueStatus::Resolved)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Reported => "Reported",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub reported_by: String,
    pub flat_number: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: IssueStatus,
    /// Unix millis
    pub timestamp: i64,
}

/// Report issue payload (unauthenticated entry point)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueCreate {
    pub reported_by: String,
    pub flat_number: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

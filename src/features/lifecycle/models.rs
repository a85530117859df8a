use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::shared::lenient;

/// Report status as reported by the report service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Submitted,
    Assigned,
    Acknowledged,
    InProgress,
    Resolved,
    Rejected,
    /// SLA overlay on whichever canonical step was active when the deadline passed
    Delayed,
}

impl ReportStatus {
    /// Happy-path order rendered by the status timeline
    pub const CANONICAL_ORDER: [ReportStatus; 5] = [
        ReportStatus::Submitted,
        ReportStatus::Assigned,
        ReportStatus::Acknowledged,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub const ALL: [ReportStatus; 7] = [
        ReportStatus::Submitted,
        ReportStatus::Assigned,
        ReportStatus::Acknowledged,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::Rejected,
        ReportStatus::Delayed,
    ];

    /// Zero-based position in the canonical order, `None` for rejected/delayed
    pub fn canonical_index(self) -> Option<usize> {
        match self {
            ReportStatus::Submitted => Some(0),
            ReportStatus::Assigned => Some(1),
            ReportStatus::Acknowledged => Some(2),
            ReportStatus::InProgress => Some(3),
            ReportStatus::Resolved => Some(4),
            ReportStatus::Rejected | ReportStatus::Delayed => None,
        }
    }

    pub fn is_canonical(self) -> bool {
        self.canonical_index().is_some()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Rejected)
    }

    /// Whether a change request from `self` to `next` is worth forwarding.
    ///
    /// Advisory only: the report service owns transitions and may still refuse.
    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        if self.is_terminal() || self == next {
            return false;
        }

        match next {
            ReportStatus::Rejected | ReportStatus::Delayed => true,
            // From delayed the underlying step is unknown here; let the server decide
            _ if self == ReportStatus::Delayed => true,
            _ => match (self.canonical_index(), next.canonical_index()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }

    /// Statuses a staff member may pick next
    pub fn next_statuses(self) -> Vec<ReportStatus> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Submitted => "submitted",
            ReportStatus::Assigned => "assigned",
            ReportStatus::Acknowledged => "acknowledged",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Delayed => "delayed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Submitted => "Submitted",
            ReportStatus::Assigned => "Assigned",
            ReportStatus::Acknowledged => "Acknowledged",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Rejected => "Rejected",
            ReportStatus::Delayed => "Delayed",
        }
    }

    /// Badge color (hex)
    pub fn color(self) -> &'static str {
        match self {
            ReportStatus::Submitted => "#6B7280",
            ReportStatus::Assigned => "#2563EB",
            ReportStatus::Acknowledged => "#7C3AED",
            ReportStatus::InProgress => "#D97706",
            ReportStatus::Resolved => "#16A34A",
            ReportStatus::Rejected => "#DC2626",
            ReportStatus::Delayed => "#EA580C",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown report status: {}", s))
    }
}

/// Neutral badge color for statuses the portal does not recognise
pub const UNKNOWN_STATUS_COLOR: &str = "#6B7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Pothole,
    Garbage,
    Streetlight,
    Drainage,
    Other,
}

impl IssueType {
    pub const ALL: [IssueType; 5] = [
        IssueType::Pothole,
        IssueType::Garbage,
        IssueType::Streetlight,
        IssueType::Drainage,
        IssueType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Pothole => "pothole",
            IssueType::Garbage => "garbage",
            IssueType::Streetlight => "streetlight",
            IssueType::Drainage => "drainage",
            IssueType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueType::Pothole => "Pothole",
            IssueType::Garbage => "Garbage",
            IssueType::Streetlight => "Streetlight",
            IssueType::Drainage => "Drainage",
            IssueType::Other => "Other",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            IssueType::Pothole => "#EF4444",
            IssueType::Garbage => "#F59E0B",
            IssueType::Streetlight => "#8B5CF6",
            IssueType::Drainage => "#3B82F6",
            IssueType::Other => "#6B7280",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            IssueType::Pothole => "🕳️",
            IssueType::Garbage => "🗑️",
            IssueType::Streetlight => "💡",
            IssueType::Drainage => "🌊",
            IssueType::Other => "📋",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|issue_type| issue_type.as_str() == s)
            .ok_or_else(|| format!("unknown issue type: {}", s))
    }
}

/// Priority label assigned by the report service from community votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High Priority",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("unknown priority: {}", s)),
        }
    }
}

/// Display state of one timeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Done,
    Active,
    Pending,
    Rejected,
}

/// One audit-trail entry; the history is append-only and ordered by timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::status")]
    pub old_status: Option<ReportStatus>,
    /// `None` when the service sent a status this portal does not know
    #[serde(default, deserialize_with = "lenient::status")]
    pub new_status: Option<ReportStatus>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

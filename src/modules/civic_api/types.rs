use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::lifecycle::{
    is_sla_breached, IssueType, Priority, ReportStatus, StatusHistoryEntry,
};
use crate::shared::geo::GeoPoint;
use crate::shared::lenient;

// =============================================================================
// USERS & AUTH
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Citizen,
    Department,
    Admin,
    /// Role the portal does not know; granted citizen-level access only
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Department staff and admins may triage reports
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Department | UserRole::Admin)
    }

    pub fn is_admin(self) -> bool {
        self == UserRole::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpstreamUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: UpstreamUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

// =============================================================================
// DEPARTMENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub ward: Option<String>,
    /// Comma-separated issue types routed to this department
    #[serde(default)]
    pub supported_issue_types: Option<String>,
}

impl Department {
    pub fn handles(&self, issue_type: IssueType) -> bool {
        self.supported_issue_types
            .as_deref()
            .map(|types| types.split(',').any(|t| t.trim() == issue_type.as_str()))
            .unwrap_or(false)
    }
}

// =============================================================================
// REPORTS
// =============================================================================

/// Read-only snapshot of a report as returned by the report service.
///
/// Enum and timestamp fields decode leniently: an unrecognised value becomes
/// `None` and the display layer falls back to neutral defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IssueReport {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::issue_type")]
    pub issue_type: Option<IssueType>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::status")]
    pub status: Option<ReportStatus>,
    #[serde(default, deserialize_with = "lenient::priority")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub priority_score: f64,
    #[serde(default)]
    pub upvote_count: u32,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub is_hotspot: bool,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub sla_deadline: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub department: Option<Department>,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
}

impl IssueReport {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Not resolved and not rejected. Unknown statuses count as open.
    pub fn is_open(&self) -> bool {
        self.status.map(|s| !s.is_terminal()).unwrap_or(true)
    }

    /// SLA deadline passed while the report is still open
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && is_sla_breached(self.sla_deadline, now)
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Some(Priority::High)
    }

    pub fn has_status(&self, status: ReportStatus) -> bool {
        self.status == Some(status)
    }
}

/// Filters accepted by the report listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReportPayload {
    pub title: String,
    pub description: String,
    pub issue_type: IssueType,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdatePayload {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

// =============================================================================
// VOTES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub report_id: i64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

use serde::Serialize;
use utoipa::ToSchema;

use crate::features::lifecycle::{IssueType, Priority, ReportStatus, SlaPolicy};

/// Presentation metadata for one status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusMetaDto {
    pub value: ReportStatus,
    pub label: String,
    pub color: String,
    /// Position in the canonical timeline, absent for rejected/delayed
    pub canonical_index: Option<usize>,
    pub terminal: bool,
}

impl From<ReportStatus> for StatusMetaDto {
    fn from(status: ReportStatus) -> Self {
        Self {
            value: status,
            label: status.label().to_string(),
            color: status.color().to_string(),
            canonical_index: status.canonical_index(),
            terminal: status.is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssueTypeMetaDto {
    pub value: IssueType,
    pub label: String,
    pub color: String,
    pub icon: String,
    /// Expected resolution window shown to citizens
    pub sla_hours: u32,
}

/// Reference tables consumed by the badge, timeline and form surfaces
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LifecycleMetaDto {
    pub statuses: Vec<StatusMetaDto>,
    pub canonical_order: Vec<ReportStatus>,
    pub issue_types: Vec<IssueTypeMetaDto>,
    pub priorities: Vec<Priority>,
}

impl LifecycleMetaDto {
    pub fn build(policy: &SlaPolicy) -> Self {
        Self {
            statuses: ReportStatus::ALL.into_iter().map(Into::into).collect(),
            canonical_order: ReportStatus::CANONICAL_ORDER.to_vec(),
            issue_types: IssueType::ALL
                .into_iter()
                .map(|issue_type| IssueTypeMetaDto {
                    value: issue_type,
                    label: issue_type.label().to_string(),
                    color: issue_type.color().to_string(),
                    icon: issue_type.icon().to_string(),
                    sla_hours: policy.window_hours(issue_type),
                })
                .collect(),
            priorities: vec![Priority::Low, Priority::Medium, Priority::High],
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::lifecycle::{IssueType, ReportStatus};
use crate::features::reports::dtos::ReportCardDto;
use crate::modules::civic_api::Department;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepartmentDto {
    pub id: i64,
    pub name: String,
    pub contact_email: Option<String>,
    pub ward: Option<String>,
    /// Issue types routed to this department
    pub issue_types: Vec<IssueType>,
}

impl From<Department> for DepartmentDto {
    fn from(d: Department) -> Self {
        let issue_types = IssueType::ALL
            .into_iter()
            .filter(|t| d.handles(*t))
            .collect();

        Self {
            id: d.id,
            name: d.name,
            contact_email: d.contact_email,
            ward: d.ward,
            issue_types,
        }
    }
}

/// One report in a department's work queue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkQueueItemDto {
    #[serde(flatten)]
    pub card: ReportCardDto,
    /// Statuses staff may move this report to
    pub next_statuses: Vec<ReportStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkQueueDto {
    pub department_id: i64,
    pub total: usize,
    /// Open reports past their SLA deadline
    pub overdue: usize,
    /// Overdue reports first, otherwise in service order
    pub reports: Vec<WorkQueueItemDto>,
}

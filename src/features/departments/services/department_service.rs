use chrono::Utc;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::departments::dtos::{DepartmentDto, WorkQueueDto, WorkQueueItemDto};
use crate::features::reports::dtos::ReportCardDto;
use crate::modules::civic_api::CivicApi;

pub struct DepartmentService {
    api: Arc<dyn CivicApi>,
}

impl DepartmentService {
    pub fn new(api: Arc<dyn CivicApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<DepartmentDto>> {
        let departments = self.api.list_departments().await?;
        Ok(departments.into_iter().map(DepartmentDto::from).collect())
    }

    /// Reports routed to a department, with what staff can do next on each
    pub async fn work_queue(&self, department_id: i64) -> Result<WorkQueueDto> {
        let now = Utc::now();
        let reports = self.api.department_reports(department_id).await?;

        let mut items: Vec<WorkQueueItemDto> = reports
            .iter()
            .map(|report| WorkQueueItemDto {
                card: ReportCardDto::from_report(report, now),
                next_statuses: report
                    .status
                    .map(|s| s.next_statuses())
                    .unwrap_or_default(),
            })
            .collect();
        // Stable: keeps service order within each group
        items.sort_by_key(|item| !item.card.sla_breached);

        let overdue = items.iter().filter(|i| i.card.sla_breached).count();
        tracing::debug!(
            "Department {} queue: {} reports, {} overdue",
            department_id,
            items.len(),
            overdue
        );

        Ok(WorkQueueDto {
            department_id,
            total: items.len(),
            overdue,
            reports: items,
        })
    }
}

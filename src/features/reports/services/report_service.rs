use chrono::Utc;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::Session;
use crate::features::lifecycle::{ReportStatus, SlaPolicy};
use crate::features::reports::dtos::{
    CreateReportDto, CreateReportResponseDto, ReportCardDto, ReportDetailDto, ReportListQuery,
    UpdateStatusDto,
};
use crate::features::reports::services::DuplicateService;
use crate::features::votes::VoteMarkerStore;
use crate::modules::civic_api::{CivicApi, IssueReport, StatusUpdatePayload};
use crate::shared::constants::ESCALATION_REMARK;
use crate::shared::geo::GeoPoint;

/// Read and triage reports through the report service
pub struct ReportService {
    api: Arc<dyn CivicApi>,
    sla_policy: Arc<SlaPolicy>,
    markers: VoteMarkerStore,
    duplicates: Arc<DuplicateService>,
}

impl ReportService {
    pub fn new(
        api: Arc<dyn CivicApi>,
        sla_policy: Arc<SlaPolicy>,
        markers: VoteMarkerStore,
        duplicates: Arc<DuplicateService>,
    ) -> Self {
        Self {
            api,
            sla_policy,
            markers,
            duplicates,
        }
    }

    pub async fn list(&self, query: &ReportListQuery) -> Result<Vec<ReportCardDto>> {
        let reports = self.api.list_reports(&query.to_upstream()).await?;
        Ok(ReportCardDto::from_reports(&reports, Utc::now()))
    }

    pub async fn list_mine(&self, session: &Session) -> Result<Vec<ReportCardDto>> {
        let reports = self.api.my_reports(session.token()).await?;
        Ok(ReportCardDto::from_reports(&reports, Utc::now()))
    }

    pub async fn get_detail(&self, id: i64, viewer: Option<&Session>) -> Result<ReportDetailDto> {
        let report = self.api.get_report(id).await?;
        Ok(self.detail(report, viewer).await)
    }

    /// Forward a new report. Nearby duplicates are reported alongside but never block it.
    pub async fn create(
        &self,
        session: &Session,
        dto: CreateReportDto,
    ) -> Result<CreateReportResponseDto> {
        let point = GeoPoint::new(dto.latitude, dto.longitude);
        let possible_duplicates = match self.duplicates.find_nearby(dto.issue_type, point).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Duplicate check skipped: {}", e);
                Vec::new()
            }
        };

        let created = self
            .api
            .create_report(session.token(), &dto.into())
            .await?;
        tracing::info!(
            "User {} created report {} ({} possible duplicates)",
            session.user_id(),
            created.id,
            possible_duplicates.len()
        );

        Ok(CreateReportResponseDto {
            report: self.detail(created, Some(session)).await,
            possible_duplicates,
        })
    }

    /// Forward a staff status change after an advisory transition check
    pub async fn update_status(
        &self,
        session: &Session,
        id: i64,
        dto: UpdateStatusDto,
    ) -> Result<ReportDetailDto> {
        let current = self.api.get_report(id).await?;
        if let Some(from) = current.status {
            if !from.can_transition_to(dto.status) {
                return Err(AppError::Conflict(format!(
                    "Cannot move a report from {} to {}",
                    from.label(),
                    dto.status.label()
                )));
            }
        }

        let remark = dto
            .remark
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| default_remark(session, dto.status));

        self.forward_status(session, id, dto.status, remark).await
    }

    /// Mark an open report as delayed on behalf of an admin
    pub async fn escalate(&self, session: &Session, id: i64) -> Result<ReportDetailDto> {
        let current = self.api.get_report(id).await?;
        match current.status {
            Some(status) if status.is_terminal() => {
                return Err(AppError::Conflict(format!(
                    "{} reports cannot be escalated",
                    status.label()
                )))
            }
            Some(ReportStatus::Delayed) => {
                return Err(AppError::Conflict("Report is already delayed".to_string()))
            }
            _ => {}
        }

        self.forward_status(
            session,
            id,
            ReportStatus::Delayed,
            ESCALATION_REMARK.to_string(),
        )
        .await
    }

    async fn forward_status(
        &self,
        session: &Session,
        id: i64,
        status: ReportStatus,
        remark: String,
    ) -> Result<ReportDetailDto> {
        let payload = StatusUpdatePayload {
            status,
            remark: Some(remark),
        };
        let updated = self
            .api
            .update_status(session.token(), id, &payload)
            .await?;

        tracing::info!(
            "User {} moved report {} to {}",
            session.user_id(),
            id,
            status
        );
        Ok(self.detail(updated, Some(session)).await)
    }

    async fn detail(&self, report: IssueReport, viewer: Option<&Session>) -> ReportDetailDto {
        let voted = match viewer {
            Some(session) => Some(self.markers.has_voted(session.user_id(), report.id).await),
            None => None,
        };
        ReportDetailDto::build(report, &self.sla_policy, Utc::now(), voted)
    }
}

fn default_remark(session: &Session, status: ReportStatus) -> String {
    if session.is_admin() {
        format!("Admin updated to {}", status)
    } else {
        format!("Status updated to {}", status)
    }
}

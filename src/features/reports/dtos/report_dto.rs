use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::lifecycle::models::UNKNOWN_STATUS_COLOR;
use crate::features::lifecycle::{
    build_timeline, IssueType, Priority, ReportStatus, SlaPolicy, SlaStatus, Timeline,
};
use crate::modules::civic_api::{CreateReportPayload, Department, IssueReport, ReportQuery};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

// ============================================================================
// Queries
// ============================================================================

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Filters for the public report list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportListQuery {
    pub issue_type: Option<IssueType>,
    pub status: Option<ReportStatus>,

    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 50, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl ReportListQuery {
    pub fn to_upstream(&self) -> ReportQuery {
        let pagination = PaginationQuery::new(self.page, self.page_size);
        ReportQuery {
            issue_type: self.issue_type,
            status: self.status,
            skip: pagination.offset(),
            limit: pagination.limit(),
        }
    }
}

// ============================================================================
// Cards
// ============================================================================

/// Compact report view used by lists, dashboards and work queues
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportCardDto {
    pub id: i64,
    pub title: String,
    /// `None` when the service sent a type this portal does not know
    pub issue_type: Option<IssueType>,
    pub issue_type_label: String,
    pub icon: String,
    pub status: Option<ReportStatus>,
    pub status_label: String,
    pub status_color: String,
    pub priority: Option<Priority>,
    pub priority_label: Option<String>,
    pub upvote_count: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub department_name: Option<String>,
    pub is_hotspot: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub sla_deadline: Option<DateTime<Utc>>,
    /// Deadline passed while the report is still open
    pub sla_breached: bool,
}

impl ReportCardDto {
    pub fn from_report(report: &IssueReport, now: DateTime<Utc>) -> Self {
        // Unknown types render like "other"
        let kind = report.issue_type.unwrap_or(IssueType::Other);

        Self {
            id: report.id,
            title: report.title.clone(),
            issue_type: report.issue_type,
            issue_type_label: kind.label().to_string(),
            icon: kind.icon().to_string(),
            status: report.status,
            status_label: report
                .status
                .map(|s| s.label())
                .unwrap_or("Unknown")
                .to_string(),
            status_color: report
                .status
                .map(|s| s.color())
                .unwrap_or(UNKNOWN_STATUS_COLOR)
                .to_string(),
            priority: report.priority,
            priority_label: report.priority.map(|p| p.label().to_string()),
            upvote_count: report.upvote_count,
            latitude: report.latitude,
            longitude: report.longitude,
            address: report.address.clone(),
            department_name: report.department.as_ref().map(|d| d.name.clone()),
            is_hotspot: report.is_hotspot,
            created_at: report.created_at,
            sla_deadline: report.sla_deadline,
            sla_breached: report.is_overdue(now),
        }
    }

    pub fn from_reports(reports: &[IssueReport], now: DateTime<Utc>) -> Vec<Self> {
        reports.iter().map(|r| Self::from_report(r, now)).collect()
    }
}

// ============================================================================
// Detail
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    SlaBreached,
    HighPriority,
}

/// Attention banner rendered above a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BannerDto {
    pub kind: BannerKind,
    pub title: String,
    pub message: Option<String>,
}

impl BannerDto {
    pub fn for_report(report: &IssueReport, now: DateTime<Utc>) -> Vec<Self> {
        let mut banners = Vec::new();

        if report.is_overdue(now) {
            banners.push(Self {
                kind: BannerKind::SlaBreached,
                title: "SLA Deadline Breached".to_string(),
                message: Some(
                    "This issue has exceeded its expected resolution time and has been escalated."
                        .to_string(),
                ),
            });
        }

        if report.is_high_priority() && !report.has_status(ReportStatus::Resolved) {
            banners.push(Self {
                kind: BannerKind::HighPriority,
                title: "High Priority Issue".to_string(),
                message: Some("Community attention needed".to_string()),
            });
        }

        banners
    }
}

/// Full report view with its lifecycle timeline
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportDetailDto {
    #[serde(flatten)]
    pub card: ReportCardDto,
    pub description: String,
    pub image_url: Option<String>,
    pub priority_score: f64,
    pub department: Option<Department>,
    pub timeline: Timeline,
    pub sla: SlaStatus,
    pub banners: Vec<BannerDto>,
    /// Whether the viewer has verified this report; absent for anonymous viewers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted: Option<bool>,
}

impl ReportDetailDto {
    pub fn build(
        report: IssueReport,
        policy: &SlaPolicy,
        now: DateTime<Utc>,
        voted: Option<bool>,
    ) -> Self {
        let card = ReportCardDto::from_report(&report, now);
        let timeline = build_timeline(report.status, &report.status_history);
        let sla = SlaStatus::evaluate(
            policy,
            report.issue_type,
            report.status,
            report.sla_deadline,
            now,
        );
        let banners = BannerDto::for_report(&report, now);

        Self {
            card,
            description: report.description,
            image_url: report.image_url,
            priority_score: report.priority_score,
            department: report.department,
            timeline,
            sla,
            banners,
            voted,
        }
    }
}

// ============================================================================
// Create
// ============================================================================

/// Request DTO for a new citizen report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[validate(
        length(min = 3, max = 200, message = "Title must be 3-200 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Title is required"
        )
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 5000, message = "Description must be 1-5000 characters"),
        regex(
            path = "*crate::shared::validation::NOT_BLANK_REGEX",
            message = "Description is required"
        )
    )]
    pub description: String,

    pub issue_type: IssueType,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,

    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

impl From<CreateReportDto> for CreateReportPayload {
    fn from(dto: CreateReportDto) -> Self {
        Self {
            title: dto.title.trim().to_string(),
            description: dto.description.trim().to_string(),
            issue_type: dto.issue_type,
            latitude: dto.latitude,
            longitude: dto.longitude,
            address: dto
                .address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            image_url: dto.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateReportResponseDto {
    pub report: ReportDetailDto,
    /// Open reports of the same type nearby; advisory only
    pub possible_duplicates: Vec<DuplicateCandidateDto>,
}

// ============================================================================
// Duplicate check
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DuplicateCheckDto {
    pub issue_type: IssueType,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DuplicateCandidateDto {
    pub id: i64,
    pub title: String,
    pub status: Option<ReportStatus>,
    pub upvote_count: u32,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DuplicateCheckResponseDto {
    pub radius_meters: f64,
    pub duplicates: Vec<DuplicateCandidateDto>,
}

// ============================================================================
// Status change
// ============================================================================

/// Request DTO for a staff status change
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    pub status: ReportStatus,

    #[validate(length(max = 500, message = "Remark must be at most 500 characters"))]
    pub remark: Option<String>,
}

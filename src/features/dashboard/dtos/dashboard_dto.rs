use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::lifecycle::ReportStatus;
use crate::features::reports::dtos::ReportCardDto;
use crate::modules::civic_api::IssueReport;

// ============================================================================
// Citizen
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CitizenStatsDto {
    pub total: usize,
    pub resolved: usize,
    /// Neither resolved nor rejected (includes delayed)
    pub pending: usize,
    pub delayed: usize,
    pub high: usize,
}

impl CitizenStatsDto {
    pub fn from_reports(reports: &[IssueReport]) -> Self {
        Self {
            total: reports.len(),
            resolved: count_status(reports, ReportStatus::Resolved),
            pending: reports.iter().filter(|r| r.is_open()).count(),
            delayed: count_status(reports, ReportStatus::Delayed),
            high: reports.iter().filter(|r| r.is_high_priority()).count(),
        }
    }
}

/// One slice of the status chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSliceDto {
    pub name: String,
    pub value: usize,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CitizenDashboardDto {
    pub stats: CitizenStatsDto,
    /// Resolved / pending / delayed, empty slices omitted
    pub breakdown: Vec<ChartSliceDto>,
    pub recent: Vec<ReportCardDto>,
    /// High-priority reports not yet resolved
    pub high_priority: Vec<ReportCardDto>,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdminStatsDto {
    pub total: usize,
    pub resolved: usize,
    pub delayed: usize,
    pub high: usize,
}

impl AdminStatsDto {
    pub fn from_reports(reports: &[IssueReport]) -> Self {
        Self {
            total: reports.len(),
            resolved: count_status(reports, ReportStatus::Resolved),
            delayed: count_status(reports, ReportStatus::Delayed),
            high: reports.iter().filter(|r| r.is_high_priority()).count(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AdminDashboardQuery {
    /// Only list reports in this status; stats always cover every report
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminDashboardDto {
    pub stats: AdminStatsDto,
    pub filter: Option<ReportStatus>,
    pub reports: Vec<ReportCardDto>,
}

fn count_status(reports: &[IssueReport], status: ReportStatus) -> usize {
    reports.iter().filter(|r| r.has_status(status)).count()
}

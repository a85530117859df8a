use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::Session;
use crate::features::dashboard::dtos::*;
use crate::features::lifecycle::ReportStatus;
use crate::features::reports::dtos::ReportCardDto;
use crate::modules::civic_api::{CivicApi, IssueReport, ReportQuery};
use crate::shared::constants::{RECENT_REPORTS_LIMIT, REPORT_SCAN_LIMIT};

/// Service for citizen and admin dashboard views
pub struct DashboardService {
    api: Arc<dyn CivicApi>,
}

impl DashboardService {
    pub fn new(api: Arc<dyn CivicApi>) -> Self {
        Self { api }
    }

    // ========================================================================
    // Citizen
    // ========================================================================

    pub async fn citizen(&self, session: &Session) -> Result<CitizenDashboardDto> {
        let reports = self.api.my_reports(session.token()).await?;
        Ok(citizen_dashboard(reports, Utc::now()))
    }

    // ========================================================================
    // Admin
    // ========================================================================

    pub async fn admin(&self, filter: Option<ReportStatus>) -> Result<AdminDashboardDto> {
        let query = ReportQuery {
            limit: REPORT_SCAN_LIMIT,
            ..ReportQuery::default()
        };
        let reports = self.api.list_reports(&query).await?;
        if reports.len() as i64 >= REPORT_SCAN_LIMIT {
            tracing::warn!(
                "Admin dashboard truncated at {} reports",
                REPORT_SCAN_LIMIT
            );
        }

        let now = Utc::now();
        let listed: Vec<ReportCardDto> = reports
            .iter()
            .filter(|r| filter.map(|status| r.has_status(status)).unwrap_or(true))
            .map(|r| ReportCardDto::from_report(r, now))
            .collect();

        Ok(AdminDashboardDto {
            stats: AdminStatsDto::from_reports(&reports),
            filter,
            reports: listed,
        })
    }
}

fn citizen_dashboard(mut reports: Vec<IssueReport>, now: DateTime<Utc>) -> CitizenDashboardDto {
    let stats = CitizenStatsDto::from_reports(&reports);

    let breakdown = [
        ("Resolved", stats.resolved, ReportStatus::Resolved.color()),
        (
            "Pending",
            stats.pending - stats.delayed,
            ReportStatus::Assigned.color(),
        ),
        ("Delayed", stats.delayed, ReportStatus::Delayed.color()),
    ]
    .into_iter()
    .filter(|(_, value, _)| *value > 0)
    .map(|(name, value, color)| ChartSliceDto {
        name: name.to_string(),
        value,
        color: color.to_string(),
    })
    .collect();

    let high_priority = reports
        .iter()
        .filter(|r| r.is_high_priority() && !r.has_status(ReportStatus::Resolved))
        .map(|r| ReportCardDto::from_report(r, now))
        .collect();

    // Newest first; reports without a timestamp sink to the end
    reports.sort_by_key(|r| Reverse(r.created_at));
    let recent = reports
        .iter()
        .take(RECENT_REPORTS_LIMIT)
        .map(|r| ReportCardDto::from_report(r, now))
        .collect();

    CitizenDashboardDto {
        stats,
        breakdown,
        recent,
        high_priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lifecycle::Priority;
    use crate::shared::test_helpers::report;
    use chrono::Duration;

    fn with(id: i64, status: ReportStatus, priority: Priority, age_hours: i64) -> IssueReport {
        let mut r = report(id);
        r.status = Some(status);
        r.priority = Some(priority);
        r.created_at = Some(Utc::now() - Duration::hours(age_hours));
        r
    }

    #[test]
    fn test_citizen_stats_and_breakdown() {
        let reports = vec![
            with(1, ReportStatus::Resolved, Priority::High, 10),
            with(2, ReportStatus::Delayed, Priority::High, 9),
            with(3, ReportStatus::InProgress, Priority::Low, 8),
            with(4, ReportStatus::Rejected, Priority::Medium, 7),
        ];

        let dashboard = citizen_dashboard(reports, Utc::now());

        assert_eq!(
            dashboard.stats,
            CitizenStatsDto {
                total: 4,
                resolved: 1,
                pending: 2,
                delayed: 1,
                high: 2,
            }
        );
        let values: Vec<(String, usize)> = dashboard
            .breakdown
            .into_iter()
            .map(|s| (s.name, s.value))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Resolved".to_string(), 1),
                ("Pending".to_string(), 1),
                ("Delayed".to_string(), 1)
            ]
        );
        let high: Vec<i64> = dashboard.high_priority.iter().map(|c| c.id).collect();
        assert_eq!(high, vec![2]);
    }

    #[test]
    fn test_recent_is_newest_five() {
        let mut reports: Vec<IssueReport> = (1..=7)
            .map(|id| with(id, ReportStatus::Assigned, Priority::Low, id))
            .collect();
        reports[0].created_at = None;

        let dashboard = citizen_dashboard(reports, Utc::now());

        let ids: Vec<i64> = dashboard.recent.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6]);
        assert!(dashboard
            .breakdown
            .iter()
            .all(|slice| slice.name == "Pending"));
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::models::{IssueType, ReportStatus};

/// Whether `now` is strictly past the deadline. No deadline means no breach.
///
/// Never cached: `now` advances independently of any report event.
pub fn is_sla_breached(sla_deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match sla_deadline {
        Some(deadline) => now > deadline,
        None => false,
    }
}

/// Signed whole hours until the deadline (negative once breached)
pub fn hours_remaining(sla_deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    sla_deadline.map(|deadline| (deadline - now).num_hours())
}

/// Expected resolution window per issue type, used only to display urgency.
///
/// The authoritative deadline is whatever the report service returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaPolicy {
    windows: HashMap<IssueType, u32>,
}

impl SlaPolicy {
    pub fn window_hours(&self, issue_type: IssueType) -> u32 {
        self.windows
            .get(&issue_type)
            .copied()
            .unwrap_or_else(|| Self::default_hours(issue_type))
    }

    pub fn set_window_hours(&mut self, issue_type: IssueType, hours: u32) {
        self.windows.insert(issue_type, hours);
    }

    fn default_hours(issue_type: IssueType) -> u32 {
        match issue_type {
            IssueType::Pothole => 72,
            IssueType::Garbage => 24,
            IssueType::Streetlight => 48,
            IssueType::Drainage => 48,
            IssueType::Other => 96,
        }
    }
}

impl Default for SlaPolicy {
    fn default() -> Self {
        let windows = IssueType::ALL
            .into_iter()
            .map(|issue_type| (issue_type, Self::default_hours(issue_type)))
            .collect();
        Self { windows }
    }
}

/// SLA annotation rendered next to a report
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SlaStatus {
    pub deadline: Option<DateTime<Utc>>,
    /// Deadline passed, regardless of status
    pub breached: bool,
    /// Deadline passed while the report is still open
    pub overdue: bool,
    pub hours_remaining: Option<i64>,
    /// Display-only window from the policy table
    pub expected_window_hours: Option<u32>,
}

impl SlaStatus {
    pub fn evaluate(
        policy: &SlaPolicy,
        issue_type: Option<IssueType>,
        status: Option<ReportStatus>,
        deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let breached = is_sla_breached(deadline, now);
        // A deadline only means something while the report is still open
        let open = status.map(|s| !s.is_terminal()).unwrap_or(true);

        Self {
            deadline,
            breached,
            overdue: breached && open,
            hours_remaining: if open {
                hours_remaining(deadline, now)
            } else {
                None
            },
            expected_window_hours: issue_type.map(|t| policy.window_hours(t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_no_deadline_is_never_breached() {
        assert!(!is_sla_breached(None, at(1, 0)));
        assert!(!is_sla_breached(None, at(31, 23)));
    }

    #[test]
    fn test_breach_is_strictly_after_deadline() {
        let deadline = at(1, 0);
        assert!(!is_sla_breached(Some(deadline), deadline));
        assert!(!is_sla_breached(Some(deadline), deadline - Duration::seconds(1)));
        assert!(is_sla_breached(Some(deadline), deadline + Duration::seconds(1)));
    }

    #[test]
    fn test_breach_after_one_day() {
        assert!(is_sla_breached(Some(at(1, 0)), at(2, 0)));
    }

    #[test]
    fn test_default_policy_windows() {
        let policy = SlaPolicy::default();
        assert_eq!(policy.window_hours(IssueType::Pothole), 72);
        assert_eq!(policy.window_hours(IssueType::Garbage), 24);
        assert_eq!(policy.window_hours(IssueType::Streetlight), 48);
        assert_eq!(policy.window_hours(IssueType::Drainage), 48);
        assert_eq!(policy.window_hours(IssueType::Other), 96);
    }

    #[test]
    fn test_policy_override() {
        let mut policy = SlaPolicy::default();
        policy.set_window_hours(IssueType::Garbage, 12);

        assert_eq!(policy.window_hours(IssueType::Garbage), 12);
        assert_eq!(policy.window_hours(IssueType::Pothole), 72);
    }

    #[test]
    fn test_resolved_report_is_not_overdue() {
        let policy = SlaPolicy::default();
        let status = SlaStatus::evaluate(
            &policy,
            Some(IssueType::Pothole),
            Some(ReportStatus::Resolved),
            Some(at(1, 0)),
            at(3, 0),
        );

        assert!(status.breached);
        assert!(!status.overdue);
        assert_eq!(status.hours_remaining, None);
    }

    #[test]
    fn test_open_report_counts_hours_remaining() {
        let policy = SlaPolicy::default();
        let status = SlaStatus::evaluate(
            &policy,
            Some(IssueType::Drainage),
            Some(ReportStatus::Acknowledged),
            Some(at(2, 6)),
            at(1, 0),
        );

        assert!(!status.overdue);
        assert_eq!(status.hours_remaining, Some(30));
        assert_eq!(status.expected_window_hours, Some(48));
    }
}

//! Status timeline derivation.
//!
//! Pure functions of a report snapshot; recomputed on every render.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::{ReportStatus, StatusHistoryEntry, StepState};

/// Display state of `step` for a report currently in `current`.
///
/// A rejected report renders as truncated right after submission. For any
/// other status the step is compared by canonical position; a current status
/// outside the canonical order (a bare `delayed`) leaves every step pending,
/// so callers resolve it with [`display_status`] first.
pub fn step_state(step: ReportStatus, current: ReportStatus) -> StepState {
    if current == ReportStatus::Rejected {
        return match step {
            ReportStatus::Submitted => StepState::Done,
            ReportStatus::Rejected => StepState::Rejected,
            _ => StepState::Pending,
        };
    }

    match (step.canonical_index(), current.canonical_index()) {
        (Some(step_idx), Some(current_idx)) if step_idx < current_idx => StepState::Done,
        (Some(step_idx), Some(current_idx)) if step_idx == current_idx => StepState::Active,
        _ => StepState::Pending,
    }
}

/// Most recent history entry that moved the report into `step`
pub fn history_entry_for(
    step: ReportStatus,
    history: &[StatusHistoryEntry],
) -> Option<&StatusHistoryEntry> {
    history
        .iter()
        .rev()
        .find(|entry| entry.new_status == Some(step))
}

/// Canonical status the timeline should be drawn against.
///
/// `delayed` is an overlay: the step shown is the last canonical status
/// recorded before the most recent delay marker, falling back to `submitted`
/// when the history does not carry one.
pub fn display_status(current: ReportStatus, history: &[StatusHistoryEntry]) -> ReportStatus {
    if current != ReportStatus::Delayed {
        return current;
    }

    let before_delay = history
        .iter()
        .rposition(|entry| entry.new_status == Some(ReportStatus::Delayed))
        .map(|idx| &history[..idx])
        .unwrap_or(history);

    before_delay
        .iter()
        .rev()
        .filter_map(|entry| entry.new_status)
        .find(|status| status.is_canonical())
        .unwrap_or(ReportStatus::Submitted)
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimelineStep {
    pub status: ReportStatus,
    pub label: String,
    pub state: StepState,
    pub occurred_at: Option<DateTime<Utc>>,
    pub remark: Option<String>,
    /// The report was escalated as delayed while at this step
    pub sla_breached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Timeline {
    /// Status as reported, `None` when unrecognised
    pub current_status: Option<ReportStatus>,
    /// Canonical status the steps were evaluated against
    pub display_status: Option<ReportStatus>,
    pub delayed: bool,
    pub steps: Vec<TimelineStep>,
}

/// Build the full timeline: one entry per canonical step, plus a trailing
/// synthetic `rejected` step for rejected reports.
///
/// The report service does not promise any order for `status_history`, so
/// entries are put in timestamp order first. Untimestamped entries sort
/// before everything else and keep their relative order.
pub fn build_timeline(current: Option<ReportStatus>, history: &[StatusHistoryEntry]) -> Timeline {
    let mut ordered = history.to_vec();
    ordered.sort_by_key(|entry| entry.timestamp);
    let history = ordered.as_slice();

    let delayed = current == Some(ReportStatus::Delayed);
    let shown = current.map(|status| display_status(status, history));

    let mut steps: Vec<TimelineStep> = ReportStatus::CANONICAL_ORDER
        .into_iter()
        .map(|step| {
            let state = shown
                .map(|status| step_state(step, status))
                .unwrap_or(StepState::Pending);
            timeline_step(step, state, delayed && state == StepState::Active, history)
        })
        .collect();

    if current == Some(ReportStatus::Rejected) {
        steps.push(timeline_step(
            ReportStatus::Rejected,
            StepState::Rejected,
            false,
            history,
        ));
    }

    Timeline {
        current_status: current,
        display_status: shown,
        delayed,
        steps,
    }
}

fn timeline_step(
    step: ReportStatus,
    state: StepState,
    sla_breached: bool,
    history: &[StatusHistoryEntry],
) -> TimelineStep {
    let entry = history_entry_for(step, history);
    TimelineStep {
        status: step,
        label: step.label().to_string(),
        state,
        occurred_at: entry.and_then(|e| e.timestamp),
        remark: entry.and_then(|e| e.remark.clone()),
        sla_breached,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(status: ReportStatus, hour: u32, remark: Option<&str>) -> StatusHistoryEntry {
        StatusHistoryEntry {
            id: None,
            old_status: None,
            new_status: Some(status),
            remark: remark.map(str::to_string),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()),
        }
    }

    fn states(timeline: &Timeline) -> Vec<StepState> {
        timeline.steps.iter().map(|s| s.state).collect()
    }

    #[test]
    fn test_build_timeline_orders_history_by_timestamp() {
        // Newest first, as an unordered relationship may return it
        let history = vec![
            entry(ReportStatus::Delayed, 9, Some("SLA breached")),
            entry(ReportStatus::InProgress, 6, Some("Crew dispatched")),
            entry(ReportStatus::Assigned, 3, Some("Re-assigned")),
            entry(ReportStatus::Assigned, 2, Some("Auto-assigned")),
            entry(ReportStatus::Submitted, 1, None),
        ];

        let timeline = build_timeline(Some(ReportStatus::Delayed), &history);

        assert_eq!(timeline.display_status, Some(ReportStatus::InProgress));
        let assigned = timeline
            .steps
            .iter()
            .find(|s| s.status == ReportStatus::Assigned)
            .unwrap();
        assert_eq!(assigned.remark.as_deref(), Some("Re-assigned"));
        assert_eq!(assigned.state, StepState::Done);
        let in_progress = timeline
            .steps
            .iter()
            .find(|s| s.status == ReportStatus::InProgress)
            .unwrap();
        assert_eq!(in_progress.state, StepState::Active);
        assert!(in_progress.sla_breached);
    }

    #[test]
    fn test_step_state_follows_canonical_index() {
        let order = ReportStatus::CANONICAL_ORDER;
        for current in order {
            for step in order {
                let expected = match step.canonical_index().cmp(&current.canonical_index()) {
                    std::cmp::Ordering::Less => StepState::Done,
                    std::cmp::Ordering::Equal => StepState::Active,
                    std::cmp::Ordering::Greater => StepState::Pending,
                };
                assert_eq!(step_state(step, current), expected, "{step} vs {current}");
            }
        }
    }

    #[test]
    fn test_step_state_for_rejected_report() {
        assert_eq!(
            step_state(ReportStatus::Submitted, ReportStatus::Rejected),
            StepState::Done
        );
        for step in &ReportStatus::CANONICAL_ORDER[1..] {
            assert_eq!(
                step_state(*step, ReportStatus::Rejected),
                StepState::Pending
            );
        }
        assert_eq!(
            step_state(ReportStatus::Rejected, ReportStatus::Rejected),
            StepState::Rejected
        );
    }

    #[test]
    fn test_bare_delayed_leaves_steps_pending() {
        for step in ReportStatus::CANONICAL_ORDER {
            assert_eq!(step_state(step, ReportStatus::Delayed), StepState::Pending);
        }
    }

    #[test]
    fn test_in_progress_scenario() {
        let timeline = build_timeline(Some(ReportStatus::InProgress), &[]);
        assert_eq!(
            states(&timeline),
            vec![
                StepState::Done,
                StepState::Done,
                StepState::Done,
                StepState::Active,
                StepState::Pending
            ]
        );
    }

    #[test]
    fn test_history_entry_for_empty_history() {
        for step in ReportStatus::ALL {
            assert!(history_entry_for(step, &[]).is_none());
        }
    }

    #[test]
    fn test_history_entry_for_picks_latest() {
        let history = vec![
            entry(ReportStatus::Assigned, 1, Some("first")),
            entry(ReportStatus::Assigned, 2, Some("again")),
        ];
        let found = history_entry_for(ReportStatus::Assigned, &history).unwrap();
        assert_eq!(found.remark.as_deref(), Some("again"));
        assert!(history_entry_for(ReportStatus::Resolved, &history).is_none());
    }

    #[test]
    fn test_rejected_scenario_adds_synthetic_step() {
        let history = vec![entry(ReportStatus::Rejected, 5, Some("invalid location"))];
        let timeline = build_timeline(Some(ReportStatus::Rejected), &history);

        assert_eq!(timeline.steps.len(), 6);
        assert_eq!(timeline.steps[0].state, StepState::Done);
        assert!(timeline.steps[1..5]
            .iter()
            .all(|s| s.state == StepState::Pending));

        let rejected = &timeline.steps[5];
        assert_eq!(rejected.status, ReportStatus::Rejected);
        assert_eq!(rejected.state, StepState::Rejected);
        assert_eq!(rejected.remark.as_deref(), Some("invalid location"));
        assert_eq!(rejected.occurred_at, history[0].timestamp);
    }

    #[test]
    fn test_delayed_overlays_last_canonical_status() {
        let history = vec![
            entry(ReportStatus::Assigned, 1, Some("Auto-assigned")),
            entry(ReportStatus::Acknowledged, 2, None),
            entry(ReportStatus::Delayed, 3, Some("SLA breached")),
        ];
        assert_eq!(
            display_status(ReportStatus::Delayed, &history),
            ReportStatus::Acknowledged
        );

        let timeline = build_timeline(Some(ReportStatus::Delayed), &history);
        assert!(timeline.delayed);
        assert_eq!(timeline.display_status, Some(ReportStatus::Acknowledged));
        assert_eq!(timeline.steps[2].state, StepState::Active);
        assert!(timeline.steps[2].sla_breached);
        assert!(timeline.steps.iter().filter(|s| s.sla_breached).count() == 1);
    }

    #[test]
    fn test_delayed_ignores_entries_after_marker() {
        let history = vec![
            entry(ReportStatus::Assigned, 1, None),
            entry(ReportStatus::Delayed, 2, None),
            entry(ReportStatus::InProgress, 3, None),
            entry(ReportStatus::Delayed, 4, None),
            entry(ReportStatus::Acknowledged, 5, None),
        ];
        assert_eq!(
            display_status(ReportStatus::Delayed, &history),
            ReportStatus::InProgress
        );
    }

    #[test]
    fn test_delayed_without_history_falls_back_to_submitted() {
        assert_eq!(
            display_status(ReportStatus::Delayed, &[]),
            ReportStatus::Submitted
        );
    }

    #[test]
    fn test_unknown_status_renders_all_pending() {
        let timeline = build_timeline(None, &[entry(ReportStatus::Assigned, 1, None)]);
        assert!(timeline
            .steps
            .iter()
            .all(|s| s.state == StepState::Pending));
        assert_eq!(timeline.display_status, None);
        // History annotations still show when a step was reached
        assert!(timeline.steps[1].occurred_at.is_some());
    }
}

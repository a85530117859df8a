/// Default page size for report listings (matches the report service default)
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound on reports fetched when a view aggregates over all of them
/// (dashboards, map, duplicate checks)
pub const REPORT_SCAN_LIMIT: i64 = 1000;

/// Reports shown in the citizen dashboard's "recent" section
pub const RECENT_REPORTS_LIMIT: usize = 5;

// =============================================================================
// STATUS REMARKS
// =============================================================================

/// Remark attached when an admin escalates a report past its SLA
pub const ESCALATION_REMARK: &str = "SLA breached — escalated by admin";

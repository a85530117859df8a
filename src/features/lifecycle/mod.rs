//! Issue lifecycle model: status ordering, SLA semantics and the display
//! rules (timeline step states, breach flags) derived from them.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sla;
pub mod timeline;

pub use models::{IssueType, Priority, ReportStatus, StatusHistoryEntry, StepState};
pub use sla::{is_sla_breached, SlaPolicy, SlaStatus};
pub use timeline::{build_timeline, Timeline};

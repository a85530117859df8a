//! Client for the external report-service REST API
//!
//! The report service owns authentication, persistence, department routing,
//! SLA deadlines, status transitions and vote counting. This module only
//! fetches snapshots and forwards change requests.

mod client;
pub mod types;

pub use client::{CivicApi, HttpCivicApi};
pub use types::{
    CreateReportPayload, Department, IssueReport, LoginPayload, ReportQuery, SignupPayload,
    StatusUpdatePayload, TokenResponse, UpstreamUser, UserRole, Vote,
};

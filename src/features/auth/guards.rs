//! Role-based authorization guards.
//!
//! Roles come from the report service:
//! - admin: full triage, escalation and the admin dashboard
//! - department: triage reports routed to a department
//! - citizen: report issues, track them and vote
//!
//! The report service enforces the same rules; these guards only avoid
//! forwarding requests that are bound to be refused.

use crate::core::error::AppError;
use crate::features::auth::model::Session;
use axum::{extract::FromRequestParts, http::request::Parts};

fn session_from(parts: &Parts) -> Result<Session, AppError> {
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for department staff or admins.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireStaff(session): RequireStaff) { ... }
/// ```
pub struct RequireStaff(pub Session);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from(parts)?;

        if !session.is_staff() {
            return Err(AppError::Forbidden(
                "Department or admin access required".to_string(),
            ));
        }

        Ok(RequireStaff(session))
    }
}

/// Guard for admins only.
pub struct RequireAdmin(pub Session);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from(parts)?;

        if !session.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(session))
    }
}

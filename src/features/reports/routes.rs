use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};

/// Public report routes; a session is attached when a valid token is sent
pub fn public_routes(state: ReportState) -> Router {
    Router::new()
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .route(
            "/api/reports/duplicate-check",
            post(handlers::check_duplicates),
        )
        .with_state(state)
}

/// Report routes that require a session
pub fn protected_routes(state: ReportState) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::create_report))
        .route("/api/reports/my", get(handlers::list_my_reports))
        .route("/api/reports/{id}/status", patch(handlers::update_status))
        .route("/api/reports/{id}/escalate", post(handlers::escalate_report))
        .with_state(state)
}

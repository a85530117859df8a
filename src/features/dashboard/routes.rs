use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Create dashboard routes (require a session)
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/citizen", get(handlers::get_citizen_dashboard))
        .route("/api/dashboard/admin", get(handlers::get_admin_dashboard))
        .with_state(dashboard_service)
}

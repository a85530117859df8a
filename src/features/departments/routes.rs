use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::departments::handlers;
use crate::features::departments::services::DepartmentService;

pub fn public_routes(service: Arc<DepartmentService>) -> Router {
    Router::new()
        .route("/api/departments", get(handlers::list_departments))
        .with_state(service)
}

/// Staff work queues (require a session)
pub fn protected_routes(service: Arc<DepartmentService>) -> Router {
    Router::new()
        .route("/api/departments/{id}/reports", get(handlers::get_work_queue))
        .with_state(service)
}

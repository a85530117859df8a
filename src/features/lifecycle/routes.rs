use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::lifecycle::handlers;
use crate::features::lifecycle::SlaPolicy;

/// Public lifecycle reference data
pub fn routes(sla_policy: Arc<SlaPolicy>) -> Router {
    Router::new()
        .route("/api/lifecycle/meta", get(handlers::get_meta))
        .with_state(sla_policy)
}

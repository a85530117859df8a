use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::map::handlers;
use crate::features::map::services::MapService;

/// Public map routes
pub fn routes(map_service: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/map/reports", get(handlers::list_markers))
        .route("/api/map/options", get(handlers::get_options))
        .with_state(map_service)
}

use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::votes::handlers;
use crate::features::votes::services::VoteService;

/// Vote routes (require a session)
pub fn routes(service: Arc<VoteService>) -> Router {
    Router::new()
        .route(
            "/api/votes/{id}",
            post(handlers::cast_vote).delete(handlers::remove_vote),
        )
        .with_state(service)
}

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::Session;
use crate::features::votes::dtos::VoteResultDto;
use crate::features::votes::services::VoteService;
use crate::shared::types::ApiResponse;

/// Verify and upvote a report
#[utoipa::path(
    post,
    path = "/api/votes/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Vote recorded", body = ApiResponse<VoteResultDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Already voted"),
        (status = 502, description = "Report service unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "votes"
)]
pub async fn cast_vote(
    session: Session,
    State(service): State<Arc<VoteService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<VoteResultDto>>> {
    let result = service.cast(&session, id).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Thanks for verifying!".to_string()),
        None,
    )))
}

/// Withdraw a vote
#[utoipa::path(
    delete,
    path = "/api/votes/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Vote removed", body = ApiResponse<VoteResultDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Vote not found")
    ),
    security(("bearer_auth" = [])),
    tag = "votes"
)]
pub async fn remove_vote(
    session: Session,
    State(service): State<Arc<VoteService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<VoteResultDto>>> {
    let result = service.remove(&session, id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

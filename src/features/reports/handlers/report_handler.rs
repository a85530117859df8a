use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireAdmin, RequireStaff};
use crate::features::auth::Session;
use crate::features::reports::dtos::{
    CreateReportDto, CreateReportResponseDto, DuplicateCheckDto, DuplicateCheckResponseDto,
    ReportCardDto, ReportDetailDto, ReportListQuery, UpdateStatusDto,
};
use crate::features::reports::services::{DuplicateService, ReportService};
use crate::shared::geo::GeoPoint;
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub duplicate_service: Arc<DuplicateService>,
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Report cards", body = ApiResponse<Vec<ReportCardDto>>),
        (status = 502, description = "Report service unavailable")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportCardDto>>>> {
    let cards = state.report_service.list(&query).await?;
    Ok(Json(ApiResponse::success(Some(cards), None, None)))
}

/// List the reports filed by the current user
#[utoipa::path(
    get,
    path = "/api/reports/my",
    responses(
        (status = 200, description = "User's reports", body = ApiResponse<Vec<ReportCardDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_my_reports(
    session: Session,
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ReportCardDto>>>> {
    let cards = state.report_service.list_mine(&session).await?;
    let total = cards.len();
    Ok(Json(ApiResponse::success(
        Some(cards),
        None,
        Some(Meta::counted(total)),
    )))
}

/// Get a report with its status timeline and SLA state
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailDto>),
        (status = 404, description = "Report not found"),
        (status = 502, description = "Report service unavailable")
    ),
    tag = "reports"
)]
pub async fn get_report(
    session: Option<Session>,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportDetailDto>>> {
    let detail = state
        .report_service
        .get_detail(id, session.as_ref())
        .await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Submit a new report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<CreateReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    session: Session,
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<CreateReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.report_service.create(&session, dto).await?;
    let message = (!created.possible_duplicates.is_empty())
        .then(|| "Similar reports exist nearby; consider upvoting them".to_string());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), message, None)),
    ))
}

/// Look for open reports of the same type near a location
#[utoipa::path(
    post,
    path = "/api/reports/duplicate-check",
    request_body = DuplicateCheckDto,
    responses(
        (status = 200, description = "Nearby reports", body = ApiResponse<DuplicateCheckResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "reports"
)]
pub async fn check_duplicates(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<DuplicateCheckDto>,
) -> Result<Json<ApiResponse<DuplicateCheckResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let duplicates = state
        .duplicate_service
        .find_nearby(dto.issue_type, GeoPoint::new(dto.latitude, dto.longitude))
        .await?;
    Ok(Json(ApiResponse::success(
        Some(DuplicateCheckResponseDto {
            radius_meters: state.duplicate_service.radius_meters(),
            duplicates,
        }),
        None,
        None,
    )))
}

/// Change a report's status (department staff or admin)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_status(
    RequireStaff(session): RequireStaff,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<ReportDetailDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let detail = state.report_service.update_status(&session, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Escalate an open report as delayed (admin)
#[utoipa::path(
    post,
    path = "/api/reports/{id}/escalate",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report escalated", body = ApiResponse<ReportDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Report is closed or already delayed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn escalate_report(
    RequireAdmin(session): RequireAdmin,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportDetailDto>>> {
    let detail = state.report_service.escalate(&session, id).await?;
    Ok(Json(ApiResponse::success(
        Some(detail),
        Some("Escalation recorded".to_string()),
        None,
    )))
}

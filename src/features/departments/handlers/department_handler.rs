use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::guards::RequireStaff;
use crate::features::departments::dtos::{DepartmentDto, WorkQueueDto};
use crate::features::departments::services::DepartmentService;
use crate::shared::types::{ApiResponse, Meta};

/// List departments and the issue types routed to them
#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Departments", body = ApiResponse<Vec<DepartmentDto>>),
        (status = 502, description = "Report service unavailable")
    ),
    tag = "departments"
)]
pub async fn list_departments(
    State(service): State<Arc<DepartmentService>>,
) -> Result<Json<ApiResponse<Vec<DepartmentDto>>>> {
    let departments = service.list().await?;
    let total = departments.len();
    Ok(Json(ApiResponse::success(
        Some(departments),
        None,
        Some(Meta::counted(total)),
    )))
}

/// Work queue for a department (staff only)
#[utoipa::path(
    get,
    path = "/api/departments/{id}/reports",
    params(
        ("id" = i64, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department work queue", body = ApiResponse<WorkQueueDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = [])),
    tag = "departments"
)]
pub async fn get_work_queue(
    RequireStaff(_session): RequireStaff,
    State(service): State<Arc<DepartmentService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<WorkQueueDto>>> {
    let queue = service.work_queue(id).await?;
    Ok(Json(ApiResponse::success(Some(queue), None, None)))
}

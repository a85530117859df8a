use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::map::dtos::{MapMarkerDto, MapOptionsDto, MapQuery};
use crate::features::map::services::MapService;
use crate::shared::types::{ApiResponse, Meta};

/// Report markers, optionally within a radius of a point
#[utoipa::path(
    get,
    path = "/api/map/reports",
    params(MapQuery),
    responses(
        (status = 200, description = "Map markers", body = ApiResponse<Vec<MapMarkerDto>>),
        (status = 400, description = "Invalid center or radius"),
        (status = 502, description = "Report service unavailable")
    ),
    tag = "map"
)]
pub async fn list_markers(
    State(service): State<Arc<MapService>>,
    Query(query): Query<MapQuery>,
) -> Result<Json<ApiResponse<Vec<MapMarkerDto>>>> {
    let markers = service.markers(&query).await?;
    let total = markers.len();
    Ok(Json(ApiResponse::success(
        Some(markers),
        None,
        Some(Meta::counted(total)),
    )))
}

/// Selectable radius options
#[utoipa::path(
    get,
    path = "/api/map/options",
    responses(
        (status = 200, description = "Map filter options", body = ApiResponse<MapOptionsDto>)
    ),
    tag = "map"
)]
pub async fn get_options(
    State(service): State<Arc<MapService>>,
) -> Result<Json<ApiResponse<MapOptionsDto>>> {
    Ok(Json(ApiResponse::success(Some(service.options()), None, None)))
}

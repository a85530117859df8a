use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::lifecycle::dtos::LifecycleMetaDto;
use crate::features::lifecycle::SlaPolicy;
use crate::shared::types::ApiResponse;

/// Status labels, colors, canonical order and SLA windows
#[utoipa::path(
    get,
    path = "/api/lifecycle/meta",
    responses(
        (status = 200, description = "Lifecycle reference data", body = ApiResponse<LifecycleMetaDto>)
    ),
    tag = "lifecycle"
)]
pub async fn get_meta(
    State(sla_policy): State<Arc<SlaPolicy>>,
) -> Result<Json<ApiResponse<LifecycleMetaDto>>> {
    let meta = LifecycleMetaDto::build(&sla_policy);
    Ok(Json(ApiResponse::success(Some(meta), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lifecycle::routes;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_meta_lists_statuses_and_sla_windows() {
        let server = TestServer::new(routes::routes(Arc::new(SlaPolicy::default()))).unwrap();

        let response = server.get("/api/lifecycle/meta").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["statuses"].as_array().unwrap().len(), 7);
        assert_eq!(body["data"]["canonical_order"][3], "in_progress");
        assert_eq!(body["data"]["issue_types"][1]["value"], "garbage");
        assert_eq!(body["data"]["issue_types"][1]["sla_hours"], 24);
    }
}

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::Session;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::{ApiResponse, Meta};

// ============================================================================
// Citizen
// ============================================================================

/// Overview of the current user's reports
#[utoipa::path(
    get,
    path = "/api/dashboard/citizen",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Citizen dashboard", body = ApiResponse<CitizenDashboardDto>),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Report service unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_citizen_dashboard(
    session: Session,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<CitizenDashboardDto>>, AppError> {
    let dashboard = service.citizen(&session).await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}

// ============================================================================
// Admin
// ============================================================================

/// City-wide stats and a status-filtered report list (admin)
#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    tag = "Dashboard",
    params(AdminDashboardQuery),
    responses(
        (status = 200, description = "Admin dashboard", body = ApiResponse<AdminDashboardDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_admin_dashboard(
    RequireAdmin(_session): RequireAdmin,
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<AdminDashboardQuery>,
) -> Result<Json<ApiResponse<AdminDashboardDto>>, AppError> {
    let dashboard = service.admin(query.status).await?;
    let listed = dashboard.reports.len();
    Ok(Json(ApiResponse::success(
        Some(dashboard),
        None,
        Some(Meta::counted(listed)),
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::dashboard::{routes, DashboardService};
    use crate::features::lifecycle::{Priority, ReportStatus};
    use crate::shared::test_helpers::{admin, citizen, report, with_session, FakeCivicApi};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    fn seeded() -> Arc<FakeCivicApi> {
        let mut delayed = report(2);
        delayed.status = Some(ReportStatus::Delayed);
        delayed.priority = Some(Priority::High);
        delayed.user_id = Some(8);
        let mut resolved = report(3);
        resolved.status = Some(ReportStatus::Resolved);

        Arc::new(
            FakeCivicApi::new()
                .with_user("tok", citizen(1))
                .with_report(report(1))
                .with_report(delayed)
                .with_report(resolved),
        )
    }

    #[tokio::test]
    async fn test_citizen_dashboard_covers_own_reports() {
        let service = Arc::new(DashboardService::new(seeded()));
        let app = with_session(routes::routes(service), "tok", citizen(1));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/dashboard/citizen").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["stats"]["total"], 2);
        assert_eq!(body["data"]["stats"]["resolved"], 1);
        assert_eq!(body["data"]["stats"]["pending"], 1);
        assert_eq!(body["data"]["recent"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_admin_dashboard_filters_list_not_stats() {
        let service = Arc::new(DashboardService::new(seeded()));
        let app = with_session(routes::routes(service), "tok", admin(9));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/dashboard/admin?status=delayed").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["stats"]["total"], 3);
        assert_eq!(body["data"]["stats"]["delayed"], 1);
        assert_eq!(body["data"]["stats"]["high"], 1);
        assert_eq!(body["data"]["filter"], "delayed");
        assert_eq!(body["data"]["reports"][0]["id"], 2);
        assert_eq!(body["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_admin_dashboard_forbidden_for_citizens() {
        let service = Arc::new(DashboardService::new(seeded()));
        let app = with_session(routes::routes(service), "tok", citizen(1));
        let server = TestServer::new(app).unwrap();

        server
            .get("/api/dashboard/admin")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

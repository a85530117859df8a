use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::departments::{dtos as departments_dtos, handlers as departments_handlers};
use crate::features::lifecycle::{self, dtos as lifecycle_dtos, handlers as lifecycle_handlers};
use crate::features::map::{dtos as map_dtos, handlers as map_handlers};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::votes::{dtos as votes_dtos, handlers as votes_handlers};
use crate::modules::civic_api::{Department, UserRole};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::signup,
        auth_handlers::login,
        auth_handlers::get_me,
        auth_handlers::logout,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::list_my_reports,
        reports_handlers::get_report,
        reports_handlers::create_report,
        reports_handlers::check_duplicates,
        reports_handlers::update_status,
        reports_handlers::escalate_report,
        // Votes
        votes_handlers::cast_vote,
        votes_handlers::remove_vote,
        // Departments
        departments_handlers::list_departments,
        departments_handlers::get_work_queue,
        // Dashboard
        dashboard_handlers::get_citizen_dashboard,
        dashboard_handlers::get_admin_dashboard,
        // Map
        map_handlers::list_markers,
        map_handlers::get_options,
        // Lifecycle
        lifecycle_handlers::get_meta,
    ),
    components(
        schemas(
            // Shared
            Meta,
            UserRole,
            Department,
            // Lifecycle
            lifecycle::ReportStatus,
            lifecycle::IssueType,
            lifecycle::Priority,
            lifecycle::StepState,
            lifecycle::StatusHistoryEntry,
            lifecycle::Timeline,
            lifecycle::timeline::TimelineStep,
            lifecycle::SlaStatus,
            lifecycle_dtos::StatusMetaDto,
            lifecycle_dtos::IssueTypeMetaDto,
            lifecycle_dtos::LifecycleMetaDto,
            ApiResponse<lifecycle_dtos::LifecycleMetaDto>,
            // Auth
            auth_dtos::SignupRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::UserDto,
            auth_dtos::LogoutResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::UserDto>,
            ApiResponse<auth_dtos::LogoutResponseDto>,
            // Reports
            reports_dtos::ReportCardDto,
            reports_dtos::ReportDetailDto,
            reports_dtos::BannerKind,
            reports_dtos::BannerDto,
            reports_dtos::CreateReportDto,
            reports_dtos::CreateReportResponseDto,
            reports_dtos::DuplicateCheckDto,
            reports_dtos::DuplicateCandidateDto,
            reports_dtos::DuplicateCheckResponseDto,
            reports_dtos::UpdateStatusDto,
            ApiResponse<Vec<reports_dtos::ReportCardDto>>,
            ApiResponse<reports_dtos::ReportDetailDto>,
            ApiResponse<reports_dtos::CreateReportResponseDto>,
            ApiResponse<reports_dtos::DuplicateCheckResponseDto>,
            // Votes
            votes_dtos::VoteResultDto,
            ApiResponse<votes_dtos::VoteResultDto>,
            // Departments
            departments_dtos::DepartmentDto,
            departments_dtos::WorkQueueItemDto,
            departments_dtos::WorkQueueDto,
            ApiResponse<Vec<departments_dtos::DepartmentDto>>,
            ApiResponse<departments_dtos::WorkQueueDto>,
            // Dashboard
            dashboard_dtos::CitizenStatsDto,
            dashboard_dtos::ChartSliceDto,
            dashboard_dtos::CitizenDashboardDto,
            dashboard_dtos::AdminStatsDto,
            dashboard_dtos::AdminDashboardDto,
            ApiResponse<dashboard_dtos::CitizenDashboardDto>,
            ApiResponse<dashboard_dtos::AdminDashboardDto>,
            // Map
            map_dtos::MapMarkerDto,
            map_dtos::RadiusOptionDto,
            map_dtos::MapOptionsDto,
            ApiResponse<Vec<map_dtos::MapMarkerDto>>,
            ApiResponse<map_dtos::MapOptionsDto>,
        )
    ),
    tags(
        (name = "auth", description = "Sign up, log in and session management"),
        (name = "reports", description = "Civic issue reports, status changes and escalation"),
        (name = "votes", description = "Community verification upvotes"),
        (name = "departments", description = "Departments and their work queues"),
        (name = "Dashboard", description = "Citizen and admin dashboards"),
        (name = "map", description = "Report markers for the map view"),
        (name = "lifecycle", description = "Status labels, colors and SLA windows"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "LetsFix Portal API",
        version = "0.1.0",
        description = "Display API for the LetsFix civic issue tracker",
    )
)]
pub struct ApiDoc;

/// Adds the bearer token security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_portal_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/reports/{id}",
            "/api/reports/{id}/escalate",
            "/api/votes/{id}",
            "/api/map/reports",
            "/api/lifecycle/meta",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}

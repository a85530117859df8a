mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::{routes as auth_routes, AuthService, SessionStore};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::departments::{routes as departments_routes, DepartmentService};
use crate::features::lifecycle::routes as lifecycle_routes;
use crate::features::map::{routes as map_routes, MapService};
use crate::features::reports::{
    routes as reports_routes, DuplicateService, ReportService, ReportState,
};
use crate::features::votes::{routes as votes_routes, VoteMarkerStore, VoteService};
use crate::modules::civic_api::{CivicApi, HttpCivicApi};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Report service client (shared by every feature)
    let http_api = HttpCivicApi::new(&config.upstream)
        .map_err(|e| anyhow::anyhow!("Failed to initialize report service client: {}", e))?;
    tracing::info!("Report service client initialized: {}", http_api.base_url());
    let api: Arc<dyn CivicApi> = Arc::new(http_api);

    // Sessions are validated upstream and cached for a short while
    let sessions = Arc::new(SessionStore::new(
        Arc::clone(&api),
        config.session.cache_ttl,
    ));
    tracing::info!(
        "Session store initialized (cache ttl: {}s)",
        config.session.cache_ttl.as_secs()
    );

    let auth_service = Arc::new(AuthService::new(Arc::clone(&api), Arc::clone(&sessions)));

    let sla_policy = Arc::new(config.sla.policy.clone());
    let vote_markers = VoteMarkerStore::new();

    // Initialize Report Services
    let duplicate_service = Arc::new(DuplicateService::new(
        Arc::clone(&api),
        config.map.duplicate_radius_meters,
    ));
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&api),
        Arc::clone(&sla_policy),
        vote_markers.clone(),
        Arc::clone(&duplicate_service),
    ));
    let report_state = ReportState {
        report_service,
        duplicate_service,
    };
    tracing::info!(
        "Report services initialized (duplicate radius: {}m)",
        config.map.duplicate_radius_meters
    );

    let vote_service = Arc::new(VoteService::new(Arc::clone(&api), vote_markers));
    let department_service = Arc::new(DepartmentService::new(Arc::clone(&api)));
    let dashboard_service = Arc::new(DashboardService::new(Arc::clone(&api)));
    let map_service = Arc::new(MapService::new(Arc::clone(&api), config.map.clone()));
    tracing::info!("Vote, department, dashboard and map services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(reports_routes::protected_routes(report_state.clone()))
        .merge(votes_routes::routes(vote_service))
        .merge(departments_routes::protected_routes(Arc::clone(
            &department_service,
        )))
        .merge(dashboard_routes::routes(dashboard_service))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&sessions),
            middleware::auth_middleware,
        ));

    // Report reads show the caller's own vote when a token is sent
    let session_aware_routes = reports_routes::public_routes(report_state).route_layer(
        axum::middleware::from_fn_with_state(
            Arc::clone(&sessions),
            middleware::optional_auth_middleware,
        ),
    );

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(departments_routes::public_routes(department_service))
        .merge(map_routes::routes(map_service))
        .merge(lifecycle_routes::routes(sla_policy));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(session_aware_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

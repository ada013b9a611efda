use analytics::AnalyticsEngine;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch},
    Router,
};
use configuration::AnalyticsParams;
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub engine: AnalyticsEngine,
}

/// The main function to configure and run the web server.
///
/// Tracing is initialized by the binary entry point, not here, so that the
/// subscriber is installed exactly once.
pub async fn run_server(addr: SocketAddr, analytics_params: AnalyticsParams) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);
    let engine = AnalyticsEngine::new(analytics_params)?;

    let app_state = Arc::new(AppState { db_repo, engine });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/analytics/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/analytics/funding-trends",
            get(handlers::get_funding_trends),
        )
        .route("/api/analytics/risk", get(handlers::get_risk_report))
        .route(
            "/api/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/api/projects/:id",
            get(handlers::get_project).delete(handlers::delete_project),
        )
        .route(
            "/api/projects/:id/funding",
            patch(handlers::update_project_funding),
        )
        .route(
            "/api/investments",
            get(handlers::list_investments).post(handlers::create_investment),
        )
        .route("/api/investments/:id", delete(handlers::delete_investment))
        .with_state(app_state)
        .layer(cors)
        // This middleware logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

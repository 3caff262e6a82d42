//! HTTP server for the content service

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use super::handlers::{auth, contacts, content, projects, site, upload};
use crate::core::{AppState, Result};

/// Request body cap on the upload route; the per-file limit is checked separately
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Creates the main application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any);

    let uploads = ServeDir::new(&state.config.uploads.dir);
    let upload_prefix = state.config.uploads.url_prefix.trim_end_matches('/').to_string();

    let router = Router::new()
        // System routes
        .route("/health", get(site::health_check))
        .route("/api", get(site::api_index))

        // Generic content collections
        .route(
            "/api/content/{collection}",
            get(content::get_content)
                .post(content::create_content)
                .put(content::update_content)
                .delete(content::delete_content),
        )

        // Site routes
        .route("/api/page", get(site::page))
        .route("/api/projects", get(projects::list_projects))
        .route(
            "/api/admin/projects",
            post(projects::create_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/api/contacts", post(contacts::submit_inquiry))
        .route("/api/forms/{collection}", get(site::form_schema))
        .route(
            "/api/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )

        // Sessions
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::current_session))

        // Admin diagnostics
        .route("/api/admin/stats", get(site::admin_stats))
        .route("/api/store/status", get(site::store_status));

    // Uploaded files are served back under their public prefix
    let router = if upload_prefix.is_empty() {
        router.fallback_service(uploads)
    } else {
        router.nest_service(&upload_prefix, uploads)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Serve HTTP until `shutdown` resolves
pub async fn start_server<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.http_addr;
    info!("Starting site-cms HTTP server on {}", addr);

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Endpoint index available at http://{}/api", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

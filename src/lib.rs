//! Agency Site - content store, admin draft workflow and REST backend

pub mod admin;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;
pub mod sync;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::db::{ContentRepository, MemoryRepository, PgRepository};
use crate::routes::AppState;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to the local dev servers.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors();

    Router::new()
        .route(
            "/api/content",
            get(routes::content::get_content).post(routes::content::save_content),
        )
        .route("/api/projects", get(routes::content::get_projects))
        .route("/api/health", get(routes::health::health_ping))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/storage", get(routes::health::health_storage))
        .route("/health/ready", get(routes::health::health_ready))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Site content carries inline images; cap bodies at 2 MB
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(cors)
}

/// Postgres when `DATABASE_URL` is set and reachable, memory otherwise.
async fn open_repository() -> Arc<dyn ContentRepository> {
    if std::env::var("DATABASE_URL").is_err() {
        tracing::info!("DATABASE_URL not set. Using in-memory content storage.");
        return Arc::new(MemoryRepository::seeded());
    }

    let pool = match db::init_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                "Failed to initialize database pool: {}. Using in-memory content storage.",
                e
            );
            return Arc::new(MemoryRepository::seeded());
        }
    };

    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
    }
    let repo = PgRepository::new(pool);
    if let Err(e) = repo.seed_if_empty().await {
        tracing::error!("Failed to seed default content: {}", e);
    }
    Arc::new(repo)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Dropping the guards stops the background writers and loses buffered lines.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    let config = ServerConfig::default();
    if config.is_production() && config.uses_default_password() {
        tracing::warn!(
            "SECURITY: ADMIN_PASSWORD is not set. \
             The fallback default password 'admin123' is insecure."
        );
    }

    let repo = open_repository().await;
    tracing::info!(backend = repo.backend(), "Content storage ready");

    let app = create_app(AppState::new(repo, &config.admin_password));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

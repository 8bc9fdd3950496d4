//! Universal Data API - Main Application Entry Point
//!
//! A multi-tenant backend where registered users bind "data endpoints" to
//! third-party providers (calendar, mail, vehicle telematics, weather, ...)
//! and fetch normalized data from them through an authenticated API.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Argon2id passwords, HS256 session tokens,
//!   SHA-256-hashed API keys
//! - **Connectors**: stub provider gateway returning demo payloads with
//!   redacted configuration
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables (fails without
//!    DATABASE_URL and APP_SECRET)
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and authentication middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration; aborts startup when APP_SECRET is absent
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let server_port = config.server_port;
    let state = AppState { pool, config };

    // Routes behind the bearer-token scheme (JSON endpoint management)
    let bearer_routes = Router::new()
        .route("/endpoints", post(handlers::endpoints::create_endpoint))
        .route("/endpoints", get(handlers::endpoints::list_endpoints))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::bearer_auth,
        ));

    // Routes behind the API-key scheme (machine data fetch)
    let api_key_routes = Router::new()
        .route("/api/universal/{id}", get(handlers::data::universal_data))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::api_key_auth,
        ));

    // Public routes plus the cookie-authenticated web UI (the web handlers
    // resolve the session cookie themselves so they can redirect to the
    // login page instead of returning 401)
    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/", get(handlers::web::login_page))
        .route("/web/login", post(handlers::web::web_login))
        .route("/dashboard", get(handlers::web::dashboard))
        .route("/web/endpoints", post(handlers::web::create_endpoint_form))
        .route("/web/admin/update", post(handlers::web::admin_update))
        .merge(bearer_routes)
        .merge(api_key_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share pool and config with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    axum::serve(listener, app).await?;

    Ok(())
}

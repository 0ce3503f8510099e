//! Student Council Portal Backend
//!
//! A REST backend that keeps the council-member roster synchronized with the
//! administrator role, verifying candidates against the external directory.

mod api;
mod auth;
mod config;
mod council;
mod db;
mod directory;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use council::CouncilService;
use db::Repository;
use directory::DirectoryClient;
use models::Role;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub council: Arc<CouncilService>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Student Council Portal Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Directory URL: {}", config.directory_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if directory credentials are not configured
    if config.oauth_client_id.is_none() || config.oauth_client_secret.is_none() {
        tracing::warn!(
            "No directory OAuth credentials configured (COUNCIL_OAUTH_CLIENT_ID / COUNCIL_OAUTH_CLIENT_SECRET). Adding members will fail!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize directory client and council service
    let directory = DirectoryClient::new(&config)?;
    let council = Arc::new(CouncilService::new(repo.clone(), directory));

    // Grant the bootstrap administrator and log a session token, so a fresh
    // deployment has one reachable admin account.
    if let Some(login) = &config.bootstrap_admin {
        repo.set_role(login, Role::Administrator).await?;
        let token = repo.create_session(login).await?;
        tracing::info!("Bootstrap administrator '{}' session token: {}", login, token);
    }

    // Create application state
    let state = AppState { repo, council };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes, all gated on an administrator session
    let api_routes = Router::new()
        .route("/council-members", get(api::list_members))
        .route("/council-members", post(api::mutate_members))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

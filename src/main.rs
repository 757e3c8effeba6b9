//! Landing Page Backend
//!
//! Publishes business landing pages at slug-addressed URLs, with a
//! session-gated admin API backed by SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod normalize;
mod render;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
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
        .with(config.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!config.log_json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting Landing Page Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.has_admin_credentials() {
        tracing::error!(
            "Missing admin credentials (LANDING_ADMIN_EMAIL / LANDING_ADMIN_PASSWORD). Admin login is disabled!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let purged = repo.purge_expired_sessions().await?;
    if purged > 0 {
        tracing::info!("Purged {} expired admin sessions", purged);
    }

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

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

    // Clone the repository for the session gate
    let repo = state.repo.clone();

    // Admin routes
    let admin_routes = Router::new()
        // Businesses
        .route(
            "/businesses",
            get(api::list_businesses).post(api::create_business),
        )
        .route(
            "/businesses/{id}",
            get(api::get_business)
                .put(api::update_business)
                .delete(api::delete_business),
        )
        .route(
            "/businesses/{id}/toggle-active",
            post(api::toggle_business_active),
        )
        .route("/businesses/{id}/active", put(api::set_business_active))
        .route("/businesses/{id}/form", get(api::get_business_form))
        .route("/businesses/{id}/preview", get(api::preview_business))
        // Templates
        .route("/templates", get(api::list_templates))
        // Session
        .route("/auth/session", get(api::current_session))
        // Apply session auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(repo.clone(), req, next)
        }));

    // Public API routes (no session required)
    let public_api_routes = Router::new()
        .route("/pages/{slug}", get(api::get_published_page))
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout));

    Router::new()
        .nest("/api", admin_routes.merge(public_api_routes))
        .route("/health", get(health_check))
        .route("/{slug}", get(api::render_published_page))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;

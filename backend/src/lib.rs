//! Genuine Parts Admin API
//!
//! Administrative HTTP API for a spare-parts inventory: staff sessions, the
//! parts catalog, the stock ledger, sales orders, the authenticity
//! verification log and classifier training images.

use axum::{middleware::map_response, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let images_prefix = state.config.uploads.public_prefix.clone();
    let images = ServeDir::new(&state.config.uploads.training_dir);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/admin-api", routes::api_routes(state.clone()))
        .nest_service(&images_prefix, images)
        .fallback(handlers::route_not_found)
        .layer(map_response(handlers::method_not_allowed_envelope))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

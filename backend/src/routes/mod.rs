//! Route definitions for the Genuine Parts Admin API

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::require_admin, AppState};

/// Routes mounted under `/admin-api`
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Session routes (public)
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        // Everything else requires a session or the internal token
        .merge(protected_routes(state))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    let upload_limit = DefaultBodyLimit::max(state.config.uploads.max_request_bytes);

    Router::new()
        .route("/dashboard", get(handlers::overview))
        // Catalog
        .route("/categories", get(handlers::list_categories))
        .route(
            "/spareparts",
            get(handlers::list_parts).post(handlers::create_part),
        )
        .route("/spareparts/detail", get(handlers::part_detail))
        .route(
            "/spareparts/:id",
            put(handlers::update_part).delete(handlers::delete_part),
        )
        // Ledger
        .route("/spareparts/:id/stock", post(handlers::adjust_stock))
        .route("/spareparts/:id/movements", get(handlers::part_movements))
        // Sales
        .route("/sales", post(handlers::create_order))
        // Training images
        .route("/training-images", get(handlers::list_images))
        .route("/training-images/stats", get(handlers::image_stats))
        .route(
            "/training-images/upload",
            post(handlers::upload_images).layer(upload_limit),
        )
        .route("/training-images/:id", delete(handlers::delete_image))
        // Verification
        .route("/verification/check", post(handlers::check_part))
        .route("/verification/log", post(handlers::log_verification))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

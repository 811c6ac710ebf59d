//! Catch-all responses for unknown routes and unsupported methods

use axum::{
    http::{header::ALLOW, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Router fallback
pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

/// Replace axum's bare 405 with the error envelope, keeping `Allow`
pub async fn method_not_allowed_envelope(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut envelope = AppError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        envelope.headers_mut().insert(ALLOW, allow);
    }
    envelope
}

//! Authentication handlers

use axum::{extract::State, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::services::auth::LoginSession;
use crate::services::AuthService;
use crate::AppState;
use shared::{ApiResponse, LoginInput};

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginInput>,
) -> AppResult<Json<ApiResponse<LoginSession>>> {
    let (username, password) = body.credentials().ok_or_else(|| {
        AppError::validation("username", "Username and password are required")
    })?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.login(username, password).await?;

    Ok(Json(ApiResponse::with_message("Login successful", session)))
}

/// Logout endpoint handler. Always succeeds; a valid session token is revoked.
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> AppResult<Json<ApiResponse<()>>> {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        let auth_service = AuthService::new(state.db.clone(), &state.config);
        if let Ok(session_id) = auth_service
            .validate_token(bearer.token())
            .and_then(|claims| claims.session_id())
        {
            auth_service.logout(session_id).await?;
        }
    }

    Ok(Json(ApiResponse::message("Logout successful")))
}

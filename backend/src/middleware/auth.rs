//! Authentication middleware
//!
//! A request is let through with either a live session token
//! (`Authorization: Bearer`) or the shared internal token (`X-Internal-Token`).
//! The resolved identity is stored as an [`AuthAdmin`] request extension.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::AuthService;
use crate::AppState;

pub const INTERNAL_TOKEN_HEADER: &str = "x-internal-token";
pub const ADMIN_ID_HEADER: &str = "x-admin-id";

type HmacSha256 = Hmac<Sha256>;

/// How the caller authenticated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthSource {
    Session(Uuid),
    Internal,
}

/// Authenticated caller
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    /// Acting admin; internal callers may not name one
    pub admin_id: Option<i64>,
    pub source: AuthSource,
}

impl AuthAdmin {
    /// The admin a write must be attributed to
    pub fn acting_admin(&self) -> AppResult<i64> {
        self.admin_id
            .ok_or_else(|| AppError::validation(ADMIN_ID_HEADER, "Acting admin required"))
    }
}

/// Reject requests that carry neither a live session nor the internal token
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let admin = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<AuthAdmin> {
    if let Some(presented) = headers
        .get(INTERNAL_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        if tokens_match(&state.config.auth.internal_api_token, presented) {
            return Ok(AuthAdmin {
                admin_id: acting_admin_header(headers),
                source: AuthSource::Internal,
            });
        }
        tracing::debug!("Internal token mismatch");
    }

    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Unauthorized("Unauthorized request".to_string()))?;

    let auth = AuthService::new(state.db.clone(), &state.config);
    let claims = auth.validate_token(bearer.token())?;
    let admin_id = claims.admin_id()?;
    let session_id = claims.session_id()?;

    if !auth.session_active(session_id, admin_id).await? {
        return Err(AppError::Unauthorized("Session expired or revoked".to_string()));
    }

    Ok(AuthAdmin {
        admin_id: Some(admin_id),
        source: AuthSource::Session(session_id),
    })
}

fn acting_admin_header(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(ADMIN_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

/// Constant-time token comparison. Both sides are reduced to HMAC digests so
/// the comparison length does not depend on the presented value. An empty
/// configured token never matches.
pub fn tokens_match(expected: &str, presented: &str) -> bool {
    if expected.is_empty() {
        return false;
    }

    let digest = |key: &str| -> Option<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes()).ok()?;
        mac.update(b"parts-admin/internal-token");
        Some(mac.finalize().into_bytes().to_vec())
    };

    let Some(expected_digest) = digest(expected) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(presented.as_bytes()) else {
        return false;
    };
    mac.update(b"parts-admin/internal-token");
    mac.verify_slice(&expected_digest).is_ok()
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthAdmin>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

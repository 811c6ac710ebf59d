//! Authenticity verification handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{ApiJson, RequestContext};
use crate::middleware::AuthAdmin;
use crate::services::verification::VerifiedPart;
use crate::services::VerificationService;
use crate::AppState;
use shared::{
    ApiResponse, ManualLogInput, NewVerificationLog, Requester, ResponseStatus,
    VerificationCheckInput,
};

/// Verdict returned to a scanner. `status` is `warning` for unknown codes.
#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub status: ResponseStatus,
    pub authentic: bool,
    pub message: String,
    pub data: Option<VerifiedPart>,
}

#[derive(Debug, Serialize)]
pub struct LoggedEntry {
    pub id: i64,
}

/// Check a part code against the catalog and log the outcome
pub async fn check_part(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ctx: RequestContext,
    ApiJson(input): ApiJson<VerificationCheckInput>,
) -> AppResult<Json<VerificationResponse>> {
    let part_code = input.part_code()?;
    let requester = Requester::resolve(input.ip_address, input.user_agent, &ctx.requester());

    let verdict = VerificationService::new(state.db)
        .check(&part_code, requester)
        .await?;

    let response = if verdict.is_authentic() {
        VerificationResponse {
            status: ResponseStatus::Success,
            authentic: true,
            message: "Spare part is GENUINE and registered in the catalog".to_string(),
            data: verdict.part,
        }
    } else {
        VerificationResponse {
            status: ResponseStatus::Warning,
            authentic: false,
            message: "Spare part NOT FOUND or counterfeit".to_string(),
            data: None,
        }
    };

    Ok(Json(response))
}

/// Append a manual verification log entry
pub async fn log_verification(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ctx: RequestContext,
    ApiJson(input): ApiJson<ManualLogInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<LoggedEntry>>)> {
    let (part_code, status) = input.validated()?;
    let requester = Requester::resolve(input.ip_address, input.user_agent, &ctx.requester());

    let id = VerificationService::new(state.db)
        .record(NewVerificationLog {
            part_code,
            status,
            sparepart_id: input.sparepart_id.filter(|id| *id > 0),
            requester,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Verification log saved",
            LoggedEntry { id },
        )),
    ))
}

//! Dashboard handler

use axum::{extract::State, Json};
use chrono::Utc;

use crate::error::AppResult;
use crate::middleware::AuthAdmin;
use crate::services::dashboard::DashboardOverview;
use crate::services::DashboardService;
use crate::AppState;
use shared::ApiResponse;

pub async fn overview(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<ApiResponse<DashboardOverview>>> {
    let service = DashboardService::new(state.db);
    let overview = service.overview(Utc::now().date_naive()).await?;
    Ok(Json(ApiResponse::data(overview)))
}

//! Sales order handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::AuthAdmin;
use crate::services::orders::CreatedOrder;
use crate::services::OrderService;
use crate::AppState;
use shared::{ApiResponse, CreateOrderInput};

/// Record a sales order with its line items
pub async fn create_order(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiJson(input): ApiJson<CreateOrderInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedOrder>>)> {
    let order = input.into_new_order(Utc::now().date_naive())?;
    let created = OrderService::new(state.db).create_order(order).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Sales transaction recorded",
            created,
        )),
    ))
}

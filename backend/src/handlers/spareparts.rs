//! HTTP handlers for the parts catalog and stock ledger

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::AuthAdmin;
use crate::services::catalog::{Category, PartMovement, Sparepart};
use crate::services::ledger::AdjustmentOutcome;
use crate::services::{CatalogService, LedgerService};
use crate::AppState;
use shared::{
    normalize_part_code, ApiResponse, CreatePartInput, FieldError, PageQuery, StockAdjustment,
    StockAdjustmentInput, UpdatePartInput,
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub kode_part: Option<String>,
}

/// List parts, newest first
pub async fn list_parts(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<Json<ApiResponse<Vec<Sparepart>>>> {
    let (limit, offset) = query.limit_offset(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let parts = CatalogService::new(state.db).list(limit, offset).await?;
    Ok(Json(ApiResponse::data(parts)))
}

/// Part detail by code
pub async fn part_detail(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiQuery(query): ApiQuery<DetailQuery>,
) -> AppResult<Json<ApiResponse<Sparepart>>> {
    let code = query
        .kode_part
        .as_deref()
        .map(normalize_part_code)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| FieldError::required("kode_part"))?;

    let part = CatalogService::new(state.db)
        .find_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Spare part".to_string()))?;

    Ok(Json(ApiResponse::data(part)))
}

pub async fn create_part(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiJson(input): ApiJson<CreatePartInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Sparepart>>)> {
    let new_part = input.into_new_part()?;
    let part = CatalogService::new(state.db).create(new_part).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Spare part created", part)),
    ))
}

pub async fn update_part(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdatePartInput>,
) -> AppResult<Json<ApiResponse<Sparepart>>> {
    let part = CatalogService::new(state.db).update(id, input).await?;
    Ok(Json(ApiResponse::with_message("Spare part updated", part)))
}

pub async fn delete_part(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    CatalogService::new(state.db).delete(id).await?;
    Ok(Json(ApiResponse::message("Spare part deleted")))
}

/// Apply a stock movement through the ledger
pub async fn adjust_stock(
    State(state): State<AppState>,
    admin: AuthAdmin,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<StockAdjustmentInput>,
) -> AppResult<Json<ApiResponse<AdjustmentOutcome>>> {
    let adjustment = StockAdjustment::try_from(input)?;
    let admin_id = admin.acting_admin()?;

    let outcome = LedgerService::new(state.db)
        .adjust_stock(id, admin_id, &adjustment)
        .await?;

    Ok(Json(ApiResponse::with_message("Stock updated", outcome)))
}

/// Movement history of one part
pub async fn part_movements(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<Json<ApiResponse<Vec<PartMovement>>>> {
    let (limit, offset) = query.limit_offset(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let movements = CatalogService::new(state.db)
        .movements(id, limit, offset)
        .await?;
    Ok(Json(ApiResponse::data(movements)))
}

pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = CatalogService::new(state.db).categories().await?;
    Ok(Json(ApiResponse::data(categories)))
}

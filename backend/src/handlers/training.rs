//! Training image handlers

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::AuthAdmin;
use crate::services::training::{TrainingImage, UploadOutcome, UploadRequest, UploadedFile};
use crate::services::TrainingService;
use crate::AppState;
use shared::{ApiResponse, OffsetQuery, TrainingStats};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

/// Multipart upload: `kode_part`, `label`, `catatan` (or `note`) and one or
/// more `images` files
pub async fn upload_images(
    State(state): State<AppState>,
    admin: AuthAdmin,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<UploadOutcome>>)> {
    let request = read_upload(multipart?).await?;

    let service = TrainingService::new(state.db, &state.config.uploads);
    let outcome = service.upload(request, admin.admin_id).await?;

    let message = format!("Uploaded {} image(s)", outcome.uploaded);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(message, outcome)),
    ))
}

async fn read_upload(mut multipart: Multipart) -> AppResult<UploadRequest> {
    let mut request = UploadRequest::default();
    let mut alternate_note = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" | "images[]" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                request.files.push(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            "kode_part" | "label" | "catatan" | "note" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                match name.as_str() {
                    "kode_part" => request.part_code = Some(value),
                    "label" => request.label = Some(value),
                    "catatan" => request.note = Some(value),
                    _ => alternate_note = Some(value),
                }
            }
            _ => {}
        }
    }

    if request.note.is_none() {
        request.note = alternate_note;
    }
    Ok(request)
}

pub async fn list_images(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiQuery(query): ApiQuery<OffsetQuery>,
) -> AppResult<Json<ApiResponse<Vec<TrainingImage>>>> {
    let (limit, offset) = query.limit_offset(DEFAULT_LIMIT, MAX_LIMIT);
    let service = TrainingService::new(state.db, &state.config.uploads);
    let images = service.list(limit, offset).await?;
    Ok(Json(ApiResponse::data(images)))
}

pub async fn image_stats(
    State(state): State<AppState>,
    _admin: AuthAdmin,
) -> AppResult<Json<ApiResponse<TrainingStats>>> {
    let service = TrainingService::new(state.db, &state.config.uploads);
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::data(stats)))
}

pub async fn delete_image(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = TrainingService::new(state.db, &state.config.uploads);
    service.delete(id).await?;
    Ok(Json(ApiResponse::message("Training image deleted")))
}

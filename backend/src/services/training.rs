//! Training image store
//!
//! Labeled part photos are written to the upload directory and indexed in
//! `training_images`. The files are consumed by the authenticity classifier,
//! which runs elsewhere.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::config::UploadConfig;
use crate::error::{AppError, AppResult};
use crate::services::catalog::CatalogService;
use shared::{
    check_image, non_blank, normalize_part_code, random_hex_suffix, training_filename,
    FieldError, TrainingLabel, TrainingStats,
};

/// Training image service
#[derive(Clone)]
pub struct TrainingService {
    db: PgPool,
    dir: PathBuf,
    public_prefix: String,
    max_file_bytes: usize,
}

/// One file received in an upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A parsed upload request
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub part_code: Option<String>,
    pub label: Option<String>,
    pub note: Option<String>,
    pub files: Vec<UploadedFile>,
}

/// A file that was accepted and indexed
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub id: i64,
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub uploaded: usize,
    pub files: Vec<StoredImage>,
}

/// Training image as listed
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TrainingImage {
    pub id: i64,
    #[serde(rename = "kode_part")]
    pub part_code: String,
    #[serde(rename = "nama_part")]
    pub part_name: Option<String>,
    pub filename: String,
    #[serde(rename = "url")]
    pub file_url: String,
    pub label: String,
    #[serde(rename = "catatan")]
    pub note: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl TrainingService {
    pub fn new(db: PgPool, uploads: &UploadConfig) -> Self {
        Self {
            db,
            dir: PathBuf::from(&uploads.training_dir),
            public_prefix: uploads.public_prefix.trim_end_matches('/').to_string(),
            max_file_bytes: uploads.max_file_bytes,
        }
    }

    /// Store every acceptable file; files that are unacceptable or cannot be
    /// written or indexed are skipped.
    ///
    /// Fails when the code or label is missing or invalid, the part is not in
    /// the catalog, or no file at all could be stored.
    pub async fn upload(
        &self,
        request: UploadRequest,
        uploaded_by: Option<i64>,
    ) -> AppResult<UploadOutcome> {
        let part_code = request
            .part_code
            .as_deref()
            .map(normalize_part_code)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| FieldError::required("kode_part"))?;
        let label = TrainingLabel::parse(request.label.as_deref().unwrap_or_default())?;

        if request.files.is_empty() {
            return Err(AppError::BadRequest(
                "At least one image must be uploaded".to_string(),
            ));
        }

        let part = CatalogService::new(self.db.clone())
            .find_by_code(&part_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Part code {}", part_code)))?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Internal(format!("Cannot create upload directory: {}", e))
        })?;

        let note = non_blank(request.note);
        let mut stored = Vec::new();

        for file in &request.files {
            let ext = match check_image(&file.filename, file.bytes.len(), self.max_file_bytes) {
                Ok(ext) => ext,
                Err(reason) => {
                    tracing::debug!(filename = %file.filename, %reason, "Skipping upload");
                    continue;
                }
            };

            let filename = training_filename(
                &part.part_code,
                label,
                Utc::now().naive_local(),
                &random_hex_suffix(),
                &ext,
            );
            let path = self.dir.join(&filename);

            if let Err(e) = tokio::fs::write(&path, &file.bytes).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to write training image"
                );
                continue;
            }

            let url = format!("{}/{}", self.public_prefix, filename);
            let inserted = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO training_images (sparepart_id, part_code, filename, file_url, label, note, uploaded_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(part.id)
            .bind(&part.part_code)
            .bind(&filename)
            .bind(&url)
            .bind(label.as_str())
            .bind(&note)
            .bind(uploaded_by)
            .fetch_one(&self.db)
            .await;

            match inserted {
                Ok(id) => stored.push(StoredImage { id, filename, url }),
                Err(e) => {
                    tracing::warn!(%filename, error = %e, "Failed to index training image");
                    remove_file_logged(&path).await;
                }
            }
        }

        if stored.is_empty() {
            return Err(AppError::BadRequest(
                "No valid images were uploaded".to_string(),
            ));
        }

        tracing::info!(
            part_code = %part.part_code,
            label = %label,
            uploaded = stored.len(),
            received = request.files.len(),
            "Training images stored"
        );

        Ok(UploadOutcome {
            uploaded: stored.len(),
            files: stored,
        })
    }

    /// Newest uploads first
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<TrainingImage>> {
        let images = sqlx::query_as::<_, TrainingImage>(
            r#"
            SELECT ti.id, ti.part_code, s.name AS part_name, ti.filename, ti.file_url,
                   ti.label, ti.note, ti.uploaded_at
            FROM training_images ti
            LEFT JOIN spareparts s ON s.id = ti.sparepart_id
            ORDER BY ti.uploaded_at DESC, ti.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(images)
    }

    pub async fn stats(&self) -> AppResult<TrainingStats> {
        let (total, asli, palsu) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE label = 'ASLI'),
                   COUNT(*) FILTER (WHERE label = 'PALSU')
            FROM training_images
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(TrainingStats { total, asli, palsu })
    }

    /// Remove the index row, then the file. A file that cannot be removed is
    /// logged and left behind.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let filename = sqlx::query_scalar::<_, String>(
            "DELETE FROM training_images WHERE id = $1 RETURNING filename",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Training image".to_string()))?;

        if let Some(path) = self.stored_path(&filename) {
            remove_file_logged(&path).await;
        }

        tracing::info!(image_id = id, %filename, "Training image deleted");
        Ok(())
    }

    /// Path of a stored file; names that are not a plain file name are refused.
    fn stored_path(&self, filename: &str) -> Option<PathBuf> {
        let name = Path::new(filename).file_name()?;
        (name == filename).then(|| self.dir.join(name))
    }
}

async fn remove_file_logged(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Training image file already missing");
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove training image file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> TrainingService {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        TrainingService::new(db, &config.uploads)
    }

    #[tokio::test]
    async fn test_stored_path_rejects_traversal() {
        let service = service();
        assert!(service.stored_path("../secret.png").is_none());
        assert!(service.stored_path("a/b.png").is_none());
        assert_eq!(
            service.stored_path("K1_ASLI_20240101_000000_abcdef.png"),
            Some(service.dir.join("K1_ASLI_20240101_000000_abcdef.png"))
        );
    }

    #[tokio::test]
    async fn test_upload_requires_code_and_label() {
        let service = service();

        let err = service
            .upload(UploadRequest::default(), Some(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "kode_part"));

        let err = service
            .upload(
                UploadRequest {
                    part_code: Some("k1".to_string()),
                    label: Some("MAYBE".to_string()),
                    ..Default::default()
                },
                Some(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "label"));
    }

    #[tokio::test]
    async fn test_upload_without_files_is_bad_request() {
        let err = service()
            .upload(
                UploadRequest {
                    part_code: Some("k1".to_string()),
                    label: Some("asli".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}

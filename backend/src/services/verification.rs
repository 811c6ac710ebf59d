//! Authenticity checks and the append-only verification log

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::catalog::{CatalogService, Sparepart};
use shared::{format_rupiah, NewVerificationLog, Requester, VerificationStatus};

/// Verification service
#[derive(Clone)]
pub struct VerificationService {
    db: PgPool,
}

/// Part data returned to a scanner when a code is recognized
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedPart {
    pub id: i64,
    pub kode_part: String,
    pub nama_part: String,
    pub kategori: Option<String>,
    pub model_motor: Option<String>,
    pub harga: String,
    pub stok: i64,
    pub deskripsi: Option<String>,
    pub qr_code: Option<String>,
    pub hologram_code: Option<String>,
    pub tanggal_produksi: Option<NaiveDate>,
    pub is_original: bool,
}

impl From<Sparepart> for VerifiedPart {
    fn from(part: Sparepart) -> Self {
        Self {
            id: part.id,
            harga: format_rupiah(part.price),
            kode_part: part.part_code,
            nama_part: part.name,
            kategori: part.category_name,
            model_motor: part.motor_model,
            stok: part.stock,
            deskripsi: part.description,
            qr_code: part.qr_code,
            hologram_code: part.hologram_code,
            tanggal_produksi: part.production_date,
            is_original: part.is_original,
        }
    }
}

/// Outcome of a check
#[derive(Debug, Clone)]
pub struct Verdict {
    pub status: VerificationStatus,
    pub part: Option<VerifiedPart>,
    pub log_id: i64,
}

impl Verdict {
    pub fn is_authentic(&self) -> bool {
        self.status == VerificationStatus::Asli
    }
}

/// Log row as shown on the dashboard
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VerificationLogEntry {
    #[serde(rename = "kode_part")]
    pub part_code: String,
    pub status: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(rename = "waktu_cek")]
    pub checked_at: DateTime<Utc>,
}

impl VerificationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Look the code up in the catalog and log the outcome.
    pub async fn check(&self, part_code: &str, requester: Requester) -> AppResult<Verdict> {
        let part = CatalogService::new(self.db.clone())
            .find_by_code(part_code)
            .await?;

        let status = if part.is_some() {
            VerificationStatus::Asli
        } else {
            VerificationStatus::TidakDitemukan
        };

        let log_id = self
            .record(NewVerificationLog {
                part_code: part_code.to_string(),
                status,
                sparepart_id: part.as_ref().map(|p| p.id),
                requester,
            })
            .await?;

        tracing::info!(part_code, status = %status, "Verification check");

        Ok(Verdict {
            status,
            part: part.map(VerifiedPart::from),
            log_id,
        })
    }

    /// Append one entry. Blank codes are logged as the unknown sentinel and a
    /// missing part reference is resolved from the code.
    pub async fn record(&self, entry: NewVerificationLog) -> AppResult<i64> {
        let entry = NewVerificationLog::normalized(
            Some(entry.part_code.as_str()),
            Some(entry.status.as_str()),
            entry.sparepart_id,
            entry.requester,
        );
        let sparepart_id = match entry.sparepart_id {
            Some(id) => Some(id),
            None => {
                sqlx::query_scalar::<_, i64>("SELECT id FROM spareparts WHERE part_code = $1")
                    .bind(&entry.part_code)
                    .fetch_optional(&self.db)
                    .await?
            }
        };

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO verification_logs (sparepart_id, part_code, status, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(sparepart_id)
        .bind(&entry.part_code)
        .bind(entry.status.as_str())
        .bind(&entry.requester.ip_address)
        .bind(&entry.requester.user_agent)
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    pub async fn latest(&self, limit: i64) -> AppResult<Vec<VerificationLogEntry>> {
        let logs = sqlx::query_as::<_, VerificationLogEntry>(
            r#"
            SELECT part_code, status, ip_address, user_agent, created_at AS checked_at
            FROM verification_logs
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    /// Checks logged on `day`
    pub async fn count_on(&self, day: NaiveDate) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM verification_logs WHERE created_at::date = $1",
        )
        .bind(day)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }
}

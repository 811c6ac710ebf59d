//! Stock ledger
//!
//! Every stock change is a read-check-write on the part row plus one appended
//! movement, committed together. The row is locked with `FOR UPDATE` when it
//! is re-read, so concurrent adjusters of the same part are serialized and
//! cannot both spend the same stock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::StockAdjustment;

/// Stock ledger service
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// Movement row appended by a successful adjustment
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockMovement {
    pub id: i64,
    pub sparepart_id: i64,
    pub admin_id: Option<i64>,
    pub movement_type: String,
    pub quantity: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of an adjustment: the new stock level and the movement recorded
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentOutcome {
    #[serde(rename = "stok")]
    pub stock: i64,
    pub movement: StockMovement,
}

impl LedgerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply `adjustment` to part `part_id` on behalf of `admin_id`.
    ///
    /// Fails with `NotFound` if the part does not exist and with
    /// `InsufficientStock` if an OUT would take stock below zero; in both cases
    /// nothing is written.
    pub async fn adjust_stock(
        &self,
        part_id: i64,
        admin_id: i64,
        adjustment: &StockAdjustment,
    ) -> AppResult<AdjustmentOutcome> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM spareparts WHERE id = $1)",
        )
        .bind(part_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Spare part".to_string()));
        }

        let mut tx = self.db.begin().await?;

        // Lock the row for the rest of the transaction
        let stock = sqlx::query_scalar::<_, i64>(
            "SELECT stock FROM spareparts WHERE id = $1 FOR UPDATE",
        )
        .bind(part_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Spare part".to_string()))?;

        let new_stock = adjustment
            .direction
            .apply(stock, adjustment.quantity)
            .ok_or(AppError::InsufficientStock {
                available: stock,
                requested: adjustment.quantity,
            })?;

        sqlx::query("UPDATE spareparts SET stock = $2, updated_at = NOW() WHERE id = $1")
            .bind(part_id)
            .bind(new_stock)
            .execute(&mut *tx)
            .await?;

        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (sparepart_id, admin_id, movement_type, quantity, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, sparepart_id, admin_id, movement_type, quantity, note, created_at
            "#,
        )
        .bind(part_id)
        .bind(admin_id)
        .bind(adjustment.direction.as_str())
        .bind(adjustment.quantity)
        .bind(&adjustment.note)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            part_id,
            admin_id,
            direction = %adjustment.direction,
            quantity = adjustment.quantity,
            from = stock,
            to = new_stock,
            "Stock adjusted"
        );

        Ok(AdjustmentOutcome {
            stock: new_stock,
            movement,
        })
    }
}

//! Dashboard overview

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::catalog::{CatalogService, Sparepart};
use crate::services::verification::{VerificationLogEntry, VerificationService};
use shared::StockSummary;

const RECENT_LIMIT: i64 = 10;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Latest movement across all parts
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecentMovement {
    pub id: i64,
    pub sparepart_id: i64,
    pub kode_part: String,
    pub nama_part: String,
    pub admin_id: Option<i64>,
    pub nama_admin: Option<String>,
    pub movement_type: String,
    pub quantity: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub total_parts: i64,
    pub total_stock: i64,
    pub total_kategori: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub monthly_revenue: Decimal,
    pub stock_summary: StockSummary,
    pub recent_movements: Vec<RecentMovement>,
    pub recent_parts: Vec<Sparepart>,
    pub total_verifikasi: i64,
    pub logs: Vec<VerificationLogEntry>,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Figures for the month containing `today`
    pub async fn overview(&self, today: NaiveDate) -> AppResult<DashboardOverview> {
        let (month_start, next_month) = month_bounds(today);

        let total_parts = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM spareparts WHERE is_original",
        )
        .fetch_one(&self.db)
        .await?;

        let total_stock = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(stock), 0)::BIGINT FROM spareparts",
        )
        .fetch_one(&self.db)
        .await?;

        let total_kategori = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.db)
            .await?;

        let total_orders = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales_orders")
            .fetch_one(&self.db)
            .await?;

        let total_revenue = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM sales_orders WHERE status = 'PAID'",
        )
        .fetch_one(&self.db)
        .await?;

        let monthly_revenue = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0) FROM sales_orders
            WHERE status = 'PAID' AND order_date >= $1 AND order_date < $2
            "#,
        )
        .bind(month_start)
        .bind(next_month)
        .fetch_one(&self.db)
        .await?;

        let totals = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT movement_type, COALESCE(SUM(quantity), 0)::BIGINT
            FROM stock_movements
            WHERE created_at::date >= $1 AND created_at::date < $2
            GROUP BY movement_type
            "#,
        )
        .bind(month_start)
        .bind(next_month)
        .fetch_all(&self.db)
        .await?;
        let stock_summary =
            StockSummary::from_totals(totals.iter().map(|(kind, total)| (kind.as_str(), *total)));

        let recent_movements = sqlx::query_as::<_, RecentMovement>(
            r#"
            SELECT sm.id, sm.sparepart_id, s.part_code AS kode_part, s.name AS nama_part,
                   sm.admin_id, a.display_name AS nama_admin, sm.movement_type,
                   sm.quantity, sm.note, sm.created_at
            FROM stock_movements sm
            JOIN spareparts s ON s.id = sm.sparepart_id
            LEFT JOIN admins a ON a.id = sm.admin_id
            ORDER BY sm.created_at DESC, sm.id DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&self.db)
        .await?;

        let recent_parts = CatalogService::new(self.db.clone())
            .list(RECENT_LIMIT, 0)
            .await?;

        let verification = VerificationService::new(self.db.clone());
        let total_verifikasi = verification.count_on(today).await?;
        let logs = verification.latest(RECENT_LIMIT).await?;

        Ok(DashboardOverview {
            total_parts,
            total_stock,
            total_kategori,
            total_orders,
            total_revenue,
            monthly_revenue,
            stock_summary,
            recent_movements,
            recent_parts,
            total_verifikasi,
            logs,
        })
    }
}

/// First day of `day`'s month and first day of the following month
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day.with_day(1).unwrap_or(day);
    let next = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };
    (start, next.unwrap_or(NaiveDate::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(date(2024, 2, 29)), (date(2024, 2, 1), date(2024, 3, 1)));
        assert_eq!(month_bounds(date(2024, 12, 31)), (date(2024, 12, 1), date(2025, 1, 1)));
        assert_eq!(month_bounds(date(2025, 1, 1)), (date(2025, 1, 1), date(2025, 2, 1)));
    }
}

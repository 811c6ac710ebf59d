//! Catalog service: spare parts and categories

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::{NewPart, PartFields, UpdatePartInput};

/// Columns selected for every part read, with the category name joined in.
const PART_COLUMNS: &str = r#"
    SELECT s.id, s.part_code, s.name, s.category_id, c.name AS category_name,
           s.price, s.stock, s.motor_model, s.description, s.qr_code,
           s.hologram_code, s.production_date, s.is_original,
           s.created_at, s.updated_at
    FROM spareparts s
    LEFT JOIN categories c ON c.id = s.category_id
"#;

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Spare part as stored, serialized with the admin frontend's field names
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Sparepart {
    pub id: i64,
    #[serde(rename = "kode_part")]
    pub part_code: String,
    #[serde(rename = "nama_part")]
    pub name: String,
    #[serde(rename = "kategori_id")]
    pub category_id: Option<i64>,
    #[serde(rename = "nama_kategori")]
    pub category_name: Option<String>,
    #[serde(rename = "harga")]
    pub price: Decimal,
    #[serde(rename = "stok")]
    pub stock: i64,
    #[serde(rename = "model_motor")]
    pub motor_model: Option<String>,
    #[serde(rename = "deskripsi")]
    pub description: Option<String>,
    pub qr_code: Option<String>,
    pub hologram_code: Option<String>,
    #[serde(rename = "tanggal_produksi")]
    pub production_date: Option<NaiveDate>,
    pub is_original: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sparepart {
    /// Editable attributes, used as the base when merging an update
    pub fn fields(&self) -> PartFields {
        PartFields {
            name: self.name.clone(),
            category_id: self.category_id,
            price: self.price,
            stock: self.stock,
            motor_model: self.motor_model.clone(),
            description: self.description.clone(),
            qr_code: self.qr_code.clone(),
            hologram_code: self.hologram_code.clone(),
            production_date: self.production_date,
            is_original: self.is_original,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nama_kategori")]
    pub name: String,
}

/// One row of a part's movement history
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PartMovement {
    pub id: i64,
    pub sparepart_id: i64,
    pub admin_id: Option<i64>,
    pub admin_name: Option<String>,
    pub movement_type: String,
    pub quantity: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CatalogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Newest parts first
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Sparepart>> {
        let sql = format!(
            "{} ORDER BY s.created_at DESC, s.id DESC LIMIT $1 OFFSET $2",
            PART_COLUMNS
        );
        let parts = sqlx::query_as::<_, Sparepart>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        Ok(parts)
    }

    pub async fn find(&self, id: i64) -> AppResult<Option<Sparepart>> {
        let sql = format!("{} WHERE s.id = $1", PART_COLUMNS);
        let part = sqlx::query_as::<_, Sparepart>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(part)
    }

    /// Fetch a part by id or fail with `NotFound`
    pub async fn get(&self, id: i64) -> AppResult<Sparepart> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Spare part".to_string()))
    }

    /// Look up by an already-normalized part code
    pub async fn find_by_code(&self, part_code: &str) -> AppResult<Option<Sparepart>> {
        let sql = format!("{} WHERE s.part_code = $1", PART_COLUMNS);
        let part = sqlx::query_as::<_, Sparepart>(&sql)
            .bind(part_code)
            .fetch_optional(&self.db)
            .await?;

        Ok(part)
    }

    pub async fn create(&self, part: NewPart) -> AppResult<Sparepart> {
        let fields = &part.fields;
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO spareparts (part_code, name, category_id, price, stock, motor_model,
                                    description, qr_code, hologram_code, production_date, is_original)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&part.part_code)
        .bind(&fields.name)
        .bind(fields.category_id)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(&fields.motor_model)
        .bind(&fields.description)
        .bind(&fields.qr_code)
        .bind(&fields.hologram_code)
        .bind(fields.production_date)
        .bind(fields.is_original)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(part_id = id, part_code = %part.part_code, "Spare part created");

        self.get(id).await
    }

    /// Merge the payload over the stored record; the part code never changes.
    ///
    /// The row stays locked from the read to the write, the same lock the
    /// ledger takes.
    pub async fn update(&self, id: i64, input: UpdatePartInput) -> AppResult<Sparepart> {
        let mut tx = self.db.begin().await?;

        let sql = format!("{} WHERE s.id = $1 FOR UPDATE OF s", PART_COLUMNS);
        let current = sqlx::query_as::<_, Sparepart>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Spare part".to_string()))?;
        let fields = input.merge_into(current.fields())?;

        sqlx::query(
            r#"
            UPDATE spareparts
            SET name = $2, category_id = $3, price = $4, stock = $5, motor_model = $6,
                description = $7, qr_code = $8, hologram_code = $9, production_date = $10,
                is_original = $11, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(fields.category_id)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(&fields.motor_model)
        .bind(&fields.description)
        .bind(&fields.qr_code)
        .bind(&fields.hologram_code)
        .bind(fields.production_date)
        .bind(fields.is_original)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM spareparts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Spare part".to_string()));
        }

        tracing::info!(part_id = id, "Spare part deleted");
        Ok(())
    }

    /// Categories ordered by name
    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.db)
                .await?;

        Ok(categories)
    }

    /// A part's stock movements, newest first
    pub async fn movements(
        &self,
        part_id: i64,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<PartMovement>> {
        self.get(part_id).await?;

        let movements = sqlx::query_as::<_, PartMovement>(
            r#"
            SELECT sm.id, sm.sparepart_id, sm.admin_id, a.display_name AS admin_name,
                   sm.movement_type, sm.quantity, sm.note, sm.created_at
            FROM stock_movements sm
            LEFT JOIN admins a ON a.id = sm.admin_id
            WHERE sm.sparepart_id = $1
            ORDER BY sm.created_at DESC, sm.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(part_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}

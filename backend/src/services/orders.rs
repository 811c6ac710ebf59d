//! Sales order service
//!
//! An order header and its line items are inserted in one transaction. Stock is
//! not touched here.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use shared::{NewOrder, OrderCode};

/// Attempts made with server-generated codes before giving up on collisions
const MAX_CODE_ATTEMPTS: u32 = 5;

const ORDER_CODE_CONSTRAINT: &str = "sales_orders_order_code_key";

/// Sales order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Identifiers of a committed order
#[derive(Debug, Clone, Serialize)]
pub struct CreatedOrder {
    pub order_id: i64,
    pub order_code: String,
    pub total_amount: Decimal,
    pub items: usize,
}

impl OrderService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create the order and all of its items, or nothing.
    ///
    /// A server-generated code that collides with an existing order is
    /// regenerated; a caller-supplied duplicate fails.
    pub async fn create_order(&self, order: NewOrder) -> AppResult<CreatedOrder> {
        let mut code = order.order_code.clone();
        let mut attempt = 1;

        loop {
            match self.insert_order(code.as_str(), &order).await {
                Ok(order_id) => {
                    tracing::info!(
                        order_id,
                        order_code = code.as_str(),
                        items = order.items.len(),
                        total = %order.total_amount,
                        "Sales order created"
                    );

                    return Ok(CreatedOrder {
                        order_id,
                        order_code: code.as_str().to_string(),
                        total_amount: order.total_amount,
                        items: order.items.len(),
                    });
                }
                Err(err)
                    if code.is_generated()
                        && attempt < MAX_CODE_ATTEMPTS
                        && is_order_code_collision(&err) =>
                {
                    tracing::warn!(
                        order_code = code.as_str(),
                        attempt,
                        "Order code collision, regenerating"
                    );
                    code = OrderCode::generate();
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn insert_order(&self, order_code: &str, order: &NewOrder) -> Result<i64, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sales_orders (order_code, order_date, customer_name, total_amount, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(order_code)
        .bind(order.order_date)
        .bind(&order.customer_name)
        .bind(order.total_amount)
        .bind(order.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO sales_order_items (order_id, sparepart_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id)
            .bind(item.sparepart_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order_id)
    }
}

fn is_order_code_collision(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.constraint())
        .map_or(false, |name| name == ORDER_CODE_CONSTRAINT)
}

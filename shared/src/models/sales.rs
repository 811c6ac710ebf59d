//! Sales order models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{non_blank, FieldError};

/// Prefix of server-generated order codes
pub const ORDER_CODE_PREFIX: &str = "ORD-";

/// Order payment status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Paid,
    Pending,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Paid => "PAID",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// One requested line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub sparepart_id: i64,
    pub quantity: i64,
    pub price: Decimal,
}

/// Raw sales payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderInput {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub order_code: Option<String>,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

/// Where an order code came from. Generated codes may be regenerated on collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCode {
    Provided(String),
    Generated(String),
}

impl OrderCode {
    pub fn generate() -> Self {
        OrderCode::Generated(generate_order_code())
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderCode::Provided(code) | OrderCode::Generated(code) => code,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, OrderCode::Generated(_))
    }
}

/// A validated order with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_code: OrderCode,
    pub order_date: NaiveDate,
    pub customer_name: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItemInput>,
}

impl CreateOrderInput {
    /// Validate items and fill in the code, date and total defaults.
    pub fn into_new_order(self, today: NaiveDate) -> Result<NewOrder, FieldError> {
        if self.items.is_empty() {
            return Err(FieldError::new("items", "Sales items must not be empty"));
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(FieldError::new(
                    "items",
                    format!("items[{}].quantity must be greater than zero", index),
                ));
            }
            if item.price < Decimal::ZERO {
                return Err(FieldError::new(
                    "items",
                    format!("items[{}].price must not be negative", index),
                ));
            }
        }

        if let Some(total) = self.total_amount {
            if total < Decimal::ZERO {
                return Err(FieldError::new("total_amount", "Total amount must not be negative"));
            }
        }

        let order_code = match non_blank(self.order_code) {
            Some(code) => OrderCode::Provided(code),
            None => OrderCode::generate(),
        };
        let total_amount = match self.total_amount {
            Some(total) => total,
            None => order_total(&self.items).ok_or_else(|| {
                FieldError::new("items", "Order total is too large to represent")
            })?,
        };

        Ok(NewOrder {
            order_code,
            order_date: self.order_date.unwrap_or(today),
            customer_name: non_blank(self.customer_name),
            total_amount,
            status: self.status.unwrap_or_default(),
            items: self.items,
        })
    }
}

/// Sum of `quantity * price` across items; `None` on overflow
pub fn order_total(items: &[OrderItemInput]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        Decimal::from(item.quantity)
            .checked_mul(item.price)
            .and_then(|line| total.checked_add(line))
    })
}

/// `ORD-` followed by six uppercase hex characters
pub fn generate_order_code() -> String {
    format!(
        "{}{}",
        ORDER_CODE_PREFIX,
        crate::validation::random_hex_suffix().to_uppercase()
    )
}

//! Stock ledger models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::{non_blank, FieldError};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockDirection {
    In,
    Out,
}

impl StockDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockDirection::In => "IN",
            StockDirection::Out => "OUT",
        }
    }

    /// Apply `quantity` to `stock` in this direction.
    ///
    /// Returns `None` when the result would be negative (or overflow), which is
    /// the ledger's insufficient-stock condition.
    pub fn apply(&self, stock: i64, quantity: i64) -> Option<i64> {
        let next = match self {
            StockDirection::In => stock.checked_add(quantity)?,
            StockDirection::Out => stock.checked_sub(quantity)?,
        };
        (next >= 0).then_some(next)
    }
}

impl fmt::Display for StockDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockDirection {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(StockDirection::In),
            "OUT" => Ok(StockDirection::Out),
            _ => Err(FieldError::new("type", "Adjustment type must be IN or OUT")),
        }
    }
}

/// Raw stock adjustment payload `{quantity, type, note?}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockAdjustmentInput {
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(rename = "type", default)]
    pub movement_type: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A validated stock adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub quantity: i64,
    pub direction: StockDirection,
    pub note: Option<String>,
}

impl StockAdjustment {
    pub fn new(
        quantity: i64,
        direction: StockDirection,
        note: Option<String>,
    ) -> Result<Self, FieldError> {
        if quantity <= 0 {
            return Err(FieldError::new("quantity", "Quantity must be greater than zero"));
        }
        Ok(Self {
            quantity,
            direction,
            note: non_blank(note),
        })
    }
}

impl TryFrom<StockAdjustmentInput> for StockAdjustment {
    type Error = FieldError;

    fn try_from(input: StockAdjustmentInput) -> Result<Self, Self::Error> {
        let direction = input
            .movement_type
            .as_deref()
            .unwrap_or_default()
            .parse::<StockDirection>()?;
        Self::new(input.quantity.unwrap_or(0), direction, input.note)
    }
}

/// Per-direction quantity totals over a period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    #[serde(rename = "IN")]
    pub stock_in: i64,
    #[serde(rename = "OUT")]
    pub stock_out: i64,
}

impl StockSummary {
    /// Fold `(movement_type, total)` rows; unknown types are ignored.
    pub fn from_totals<'a>(rows: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        rows.into_iter()
            .fold(Self::default(), |mut summary, (kind, total)| {
                match kind.parse::<StockDirection>() {
                    Ok(StockDirection::In) => summary.stock_in += total,
                    Ok(StockDirection::Out) => summary.stock_out += total,
                    Err(_) => {}
                }
                summary
            })
    }
}

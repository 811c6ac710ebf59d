//! Spare part catalog models
//!
//! Wire names follow the admin frontend (`kode_part`, `nama_part`, `harga`, ...);
//! the Rust side uses English field names.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::validation::{non_blank, normalize_part_code, FieldError, MAX_PART_CODE_LEN};

/// Editable attributes of a part (everything except its id and code)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartFields {
    pub name: String,
    pub category_id: Option<i64>,
    pub price: Decimal,
    pub stock: i64,
    pub motor_model: Option<String>,
    pub description: Option<String>,
    pub qr_code: Option<String>,
    pub hologram_code: Option<String>,
    pub production_date: Option<NaiveDate>,
    pub is_original: bool,
}

/// A validated part ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewPart {
    pub part_code: String,
    pub fields: PartFields,
}

/// Input for creating a part
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePartInput {
    #[serde(rename = "kode_part", default)]
    pub part_code: Option<String>,

    #[serde(rename = "nama_part", default)]
    #[validate(length(max = 150, message = "Field nama_part must be at most 150 characters"))]
    pub name: Option<String>,

    #[serde(rename = "kategori_id", default)]
    pub category_id: Option<i64>,

    #[serde(rename = "harga", default)]
    pub price: Option<Decimal>,

    #[serde(rename = "stok", default)]
    #[validate(range(min = 0, message = "Field stok must not be negative"))]
    pub stock: Option<i64>,

    #[serde(rename = "model_motor", default)]
    #[validate(length(max = 100, message = "Field model_motor must be at most 100 characters"))]
    pub motor_model: Option<String>,

    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Field qr_code must be at most 100 characters"))]
    pub qr_code: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Field hologram_code must be at most 100 characters"))]
    pub hologram_code: Option<String>,

    #[serde(rename = "tanggal_produksi", default)]
    pub production_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "flag")]
    pub is_original: Option<bool>,
}

impl CreatePartInput {
    /// Check required fields in order, then field rules.
    pub fn into_new_part(self) -> Result<NewPart, FieldError> {
        let part_code = non_blank(self.part_code.clone())
            .map(|code| normalize_part_code(&code))
            .ok_or_else(|| FieldError::required("kode_part"))?;
        if !is_valid_part_code(&part_code) {
            return Err(FieldError::new(
                "kode_part",
                format!("Field kode_part must be at most {} characters", MAX_PART_CODE_LEN),
            ));
        }
        let name = non_blank(self.name.clone()).ok_or_else(|| FieldError::required("nama_part"))?;
        let price = self
            .price
            .filter(|p| !p.is_zero())
            .ok_or_else(|| FieldError::required("harga"))?;

        self.validate().map_err(first_rule_violation)?;
        check_price(price)?;

        Ok(NewPart {
            part_code,
            fields: PartFields {
                name,
                category_id: self.category_id,
                price,
                stock: self.stock.unwrap_or(0),
                motor_model: non_blank(self.motor_model),
                description: non_blank(self.description),
                qr_code: non_blank(self.qr_code),
                hologram_code: non_blank(self.hologram_code),
                production_date: self.production_date,
                is_original: self.is_original.unwrap_or(true),
            },
        })
    }
}

/// Input for updating a part. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePartInput {
    #[serde(rename = "nama_part", default)]
    #[validate(length(max = 150, message = "Field nama_part must be at most 150 characters"))]
    pub name: Option<String>,

    /// Absent keeps the category, `null` clears it
    #[serde(rename = "kategori_id", default, deserialize_with = "present")]
    pub category_id: Option<Option<i64>>,

    #[serde(rename = "harga", default)]
    pub price: Option<Decimal>,

    #[serde(rename = "stok", default)]
    #[validate(range(min = 0, message = "Field stok must not be negative"))]
    pub stock: Option<i64>,

    #[serde(rename = "model_motor", default)]
    #[validate(length(max = 100, message = "Field model_motor must be at most 100 characters"))]
    pub motor_model: Option<String>,

    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Field qr_code must be at most 100 characters"))]
    pub qr_code: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Field hologram_code must be at most 100 characters"))]
    pub hologram_code: Option<String>,

    #[serde(rename = "tanggal_produksi", default)]
    pub production_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "flag")]
    pub is_original: Option<bool>,
}

impl UpdatePartInput {
    /// Overlay this input on the stored fields.
    pub fn merge_into(self, current: PartFields) -> Result<PartFields, FieldError> {
        self.validate().map_err(first_rule_violation)?;

        let price = match self.price {
            Some(price) => {
                check_price(price)?;
                price
            }
            None => current.price,
        };

        Ok(PartFields {
            name: non_blank(self.name).unwrap_or(current.name),
            category_id: self.category_id.unwrap_or(current.category_id),
            price,
            stock: self.stock.unwrap_or(current.stock),
            motor_model: merge_text(self.motor_model, current.motor_model),
            description: merge_text(self.description, current.description),
            qr_code: merge_text(self.qr_code, current.qr_code),
            hologram_code: merge_text(self.hologram_code, current.hologram_code),
            production_date: self.production_date.or(current.production_date),
            is_original: self.is_original.unwrap_or(current.is_original),
        })
    }
}

/// `kode_part` is valid when non-blank and short enough for the catalog column.
pub fn is_valid_part_code(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code.len() <= MAX_PART_CODE_LEN
}

fn merge_text(incoming: Option<String>, current: Option<String>) -> Option<String> {
    match incoming {
        Some(value) => non_blank(Some(value)),
        None => current,
    }
}

fn check_price(price: Decimal) -> Result<(), FieldError> {
    if price <= Decimal::ZERO {
        return Err(FieldError::new("harga", "Field harga must be greater than zero"));
    }
    Ok(())
}

/// Pick one violation deterministically (alphabetical by field).
fn first_rule_violation(errors: validator::ValidationErrors) -> FieldError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Field {} is invalid", field));
                FieldError::new(field, message)
            })
        })
        .unwrap_or_else(|| FieldError::new("payload", "Invalid payload"))
}

/// Distinguishes a key sent as `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts `true`/`false` as well as the legacy `1`/`0`.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}

//! Validation and normalization helpers for the Genuine Parts Admin API

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// A rejected input field. The first failure found is the one reported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, format!("Field {} is required", field))
    }
}

/// Maximum length of a part code
pub const MAX_PART_CODE_LEN: usize = 50;

/// Normalize a part code: surrounding whitespace removed, uppercased.
pub fn normalize_part_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalize an optional free-text value, mapping blank strings to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Format an amount as Indonesian Rupiah, e.g. `Rp 1.250.000`.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Six lowercase hex characters drawn from a v4 UUID.
pub fn random_hex_suffix() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..6].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_normalize_part_code() {
        assert_eq!(normalize_part_code("  06455-kvb-901 "), "06455-KVB-901");
        assert_eq!(normalize_part_code(""), "");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" rusak ".to_string())), Some("rusak".to_string()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(dec("1250000")), "Rp 1.250.000");
        assert_eq!(format_rupiah(dec("85000.00")), "Rp 85.000");
        assert_eq!(format_rupiah(dec("999")), "Rp 999");
        assert_eq!(format_rupiah(dec("0")), "Rp 0");
        assert_eq!(format_rupiah(dec("1499.5")), "Rp 1.500");
    }

    #[test]
    fn test_random_hex_suffix() {
        let suffix = random_hex_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_field_error_message() {
        let err = FieldError::required("kode_part");
        assert_eq!(err.to_string(), "Field kode_part is required");
        assert_eq!(err.field, "kode_part");
    }

    proptest! {
        #[test]
        fn prop_normalized_code_is_idempotent(code in "[ a-zA-Z0-9-]{0,20}") {
            let once = normalize_part_code(&code);
            prop_assert_eq!(normalize_part_code(&once), once.clone());
            prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        }

        #[test]
        fn prop_rupiah_round_trips_digits(amount in 0i64..10_000_000_000i64) {
            let formatted = format_rupiah(Decimal::from(amount));
            let digits: String = formatted
                .trim_start_matches("Rp ")
                .chars()
                .filter(|c| *c != '.')
                .collect();
            prop_assert_eq!(digits, amount.to_string());
        }
    }
}

//! Field-level validation helpers shared by request DTOs.
//!
//! The `validate_*` functions have the signature expected by
//! `#[validate(custom(function = ...))]`.

use validator::ValidationError;

/// Currency assumed when an item is created without one.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// A currency code is exactly three ASCII letters (ISO 4217 shape).
pub fn validate_currency(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency").with_message("must be a 3-letter code".into()))
    }
}

/// Prices must be finite and non-negative.
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("price").with_message("must be a non-negative number".into()))
    }
}

/// Titles and names must contain something other than whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("must not be blank".into()))
    } else {
        Ok(())
    }
}

/// Normalise a currency code for storage (`usd` -> `USD`).
pub fn normalize_currency(code: Option<&str>) -> String {
    code.map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

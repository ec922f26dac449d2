//! Field-level constraints for products, customers and orders.
//!
//! Every rule is pure: it inspects a value and either hands back the value to
//! persist or the first constraint it violates.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::OrderStatus;

pub const PRODUCT_NAME_MAX_LEN: usize = 255;
pub const CUSTOMER_NAME_MAX_LEN: usize = 100;
pub const PRICE_MAX_DIGITS: u32 = 10;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: &'static str },

    #[error("{field} may not be blank")]
    BlankValue { field: &'static str },

    #[error("{field} must have at most {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("{field} must be greater than zero")]
    NonPositiveValue { field: &'static str },

    #[error("{field} must have at most {max_digits} digits with {decimal_places} decimal places")]
    Precision {
        field: &'static str,
        max_digits: u32,
        decimal_places: u32,
    },

    #[error("{value:?} is not a valid choice for {field}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("{field} references unknown {entity} {id}")]
    DanglingReference {
        field: &'static str,
        entity: &'static str,
        id: Uuid,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::RequiredField { field }
            | ValidationError::BlankValue { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NonPositiveValue { field }
            | ValidationError::Precision { field, .. }
            | ValidationError::InvalidEnumValue { field, .. }
            | ValidationError::DanglingReference { field, .. } => field,
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RequiredField { .. } => "required",
            ValidationError::BlankValue { .. } => "blank",
            ValidationError::TooLong { .. } => "too_long",
            ValidationError::NonPositiveValue { .. } => "non_positive",
            ValidationError::Precision { .. } => "precision",
            ValidationError::InvalidEnumValue { .. } => "invalid_choice",
            ValidationError::DanglingReference { .. } => "dangling_reference",
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub fn required<T>(field: &'static str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or(ValidationError::RequiredField { field })
}

/// Non-blank text, optionally bounded in characters (not bytes).
pub fn text(field: &'static str, value: String, max: Option<usize>) -> ValidationResult<String> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankValue { field });
    }
    if let Some(max) = max {
        let len = value.chars().count();
        if len > max {
            return Err(ValidationError::TooLong { field, max, len });
        }
    }
    Ok(value)
}

pub fn product_name(value: String) -> ValidationResult<String> {
    text("name", value, Some(PRODUCT_NAME_MAX_LEN))
}

pub fn customer_name(value: String) -> ValidationResult<String> {
    text("name", value, Some(CUSTOMER_NAME_MAX_LEN))
}

pub fn customer_address(value: String) -> ValidationResult<String> {
    text("address", value, None)
}

/// Exclusive upper bound for a price: 10 digits of which 2 are fractional.
pub fn price_limit() -> Decimal {
    Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES))
}

/// Checks a price and returns it at a fixed scale of two decimal places.
pub fn price(value: Decimal) -> ValidationResult<Decimal> {
    const FIELD: &str = "price";

    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveValue { field: FIELD });
    }

    let mut normalized = value.normalize();
    if normalized.scale() > PRICE_DECIMAL_PLACES || normalized >= price_limit() {
        return Err(ValidationError::Precision {
            field: FIELD,
            max_digits: PRICE_MAX_DIGITS,
            decimal_places: PRICE_DECIMAL_PLACES,
        });
    }

    normalized.rescale(PRICE_DECIMAL_PLACES);
    Ok(normalized)
}

pub fn order_status(value: &str) -> ValidationResult<OrderStatus> {
    value.parse()
}

/// Drops repeated ids, keeping the first occurrence of each.
pub fn unique_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

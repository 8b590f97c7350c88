//! # Validation Module
//!
//! Field validation for discount and price inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host field metadata                                          │
//! │  └── Decimal digits, required flags                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: discount-hooks (create / write)                              │
//! │  └── THIS MODULE: discount range, non-negative prices, ids             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator (pricing.rs)                                      │
//! │  └── No re-validation; tolerates discount = 1 without dividing         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::config::MAX_TOTAL_DIGITS;
use crate::discount::Discount;
use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a discount fraction: 0 ≤ d < 1.
///
/// ## Example
/// ```rust
/// use discount_core::validation::validate_discount;
/// use discount_core::Discount;
/// use rust_decimal::Decimal;
///
/// assert!(validate_discount("discount", Discount::new(Decimal::new(5, 2))).is_ok());
/// assert!(validate_discount("discount", Discount::FULL).is_err());
/// ```
pub fn validate_discount(field: &str, discount: Discount) -> ValidationResult<()> {
    Discount::try_new(field, discount.value()).map(|_| ())
}

/// Validates a price: must not be negative. Zero is allowed.
pub fn validate_unit_price(field: &str, price: Decimal) -> ValidationResult<()> {
    if price < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an optional price.
pub fn validate_optional_price(field: &str, price: Option<Decimal>) -> ValidationResult<()> {
    match price {
        Some(price) => validate_unit_price(field, price),
        None => Ok(()),
    }
}

/// Validates one precision setting.
///
/// A single field may use at most half the decimal mantissa so that the
/// extended gross precision (price + discount) still fits.
pub fn validate_digits(field: &str, digits: u32) -> ValidationResult<()> {
    let max = MAX_TOTAL_DIGITS / 2 - 2;
    if digits > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: max as i64,
        });
    }
    Ok(())
}

/// Validates an entity reference: a non-blank UUID.
///
/// `field` names the reference in the error, e.g. `contract_id`.
///
/// ## Example
/// ```rust
/// use discount_core::validation::validate_entity_id;
///
/// assert!(validate_entity_id("contract_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_entity_id("contract_id", "contract-7").is_err());
/// ```
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    match uuid::Uuid::parse_str(id) {
        Ok(_) => Ok(()),
        Err(e) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

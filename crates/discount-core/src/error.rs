//! # Error Types
//!
//! Domain-specific error types for discount-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  discount-core errors (this file)                                      │
//! │  ├── CoreError        - Arithmetic and configuration failures          │
//! │  └── ValidationError  - Field values rejected at the host boundary     │
//! │                                                                         │
//! │  discount-hooks errors (separate crate)                                │
//! │  └── HookError        - Lifecycle, invoicing and config failures       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → HookError → host framework        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing gross price is NOT an error: the calculator degenerates to a
//! no-op. A discount of exactly 1 is NOT an error either: the inverse
//! computation falls back to the gross price instead of dividing by zero.

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A decimal operation left the representable range.
    ///
    /// ## When This Occurs
    /// - Gross prices near `Decimal::MAX`
    /// - Back-deriving a gross price through a discount close to (but not
    ///   exactly) 1, which multiplies the net price by a huge factor
    #[error("Decimal overflow while computing {operation}")]
    ArithmeticOverflow { operation: &'static str },

    /// Configured precision cannot be represented by a 96-bit decimal.
    #[error("Invalid precision: price {price_digits} + discount {discount_digits} digits exceeds {max}")]
    InvalidDigits {
        price_digits: u32,
        discount_digits: u32,
        max: u32,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the [`crate::validation`] functions, which the host calls when
/// a field is written. The calculator itself never re-validates.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Discount outside the half-open range [0, 1).
    #[error("{field} must be at least 0 and less than 1, got {value}")]
    DiscountOutOfRange { field: String, value: Decimal },

    /// Price or quantity below zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Field is derived and cannot be written directly.
    #[error("{field} is read-only while a discount applies")]
    ReadOnly { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ArithmeticOverflow {
            operation: "unit price",
        };
        assert_eq!(err.to_string(), "Decimal overflow while computing unit price");

        let err = CoreError::InvalidDigits {
            price_digits: 20,
            discount_digits: 10,
            max: 28,
        };
        assert_eq!(
            err.to_string(),
            "Invalid precision: price 20 + discount 10 digits exceeds 28"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::DiscountOutOfRange {
            field: "discount".to_string(),
            value: dec!(1.5),
        };
        assert_eq!(
            err.to_string(),
            "discount must be at least 0 and less than 1, got 1.5"
        );

        let err = ValidationError::ReadOnly {
            field: "unit_price".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unit_price is read-only while a discount applies"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

//! # Discount Module
//!
//! Provides the `Discount` type: a fraction of a price taken off.
//!
//! ## Why Compose Instead of Add?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SUCCESSIVE DISCOUNTS ARE NOT ADDITIVE                                  │
//! │                                                                         │
//! │  Line discount 10%, contract discount 5% on 100.00:                     │
//! │    100.00 × 0.90 = 90.00   (line)                                       │
//! │     90.00 × 0.95 = 85.50   (contract, applied on the discounted price)  │
//! │                                                                         │
//! │  Effective discount = 14.5%, not 15%:                                   │
//! │    d₁ + d₂ − d₁·d₂ = 0.10 + 0.05 − 0.005 = 0.145                        │
//! │                                                                         │
//! │  The formula is symmetric: line-then-contract == contract-then-line.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use discount_core::Discount;
//! use rust_decimal::Decimal;
//!
//! let line = Discount::new(Decimal::new(10, 2));     // 10%
//! let contract = Discount::new(Decimal::new(5, 2));  // 5%
//!
//! assert_eq!(line.compose(contract).value(), Decimal::new(145, 3));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Discount Type
// =============================================================================

/// A discount expressed as a fraction: `0.15` is 15% off.
///
/// ## Design Decisions
/// - **Decimal, not basis points**: discount precision is configurable
///   (4 digits by default) so a fixed integer scale cannot represent it
/// - **Unchecked constructor**: the host validates at the field boundary;
///   the calculator must still survive out-of-range values such as 1
/// - **Newtype serde**: serialized as the bare decimal string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount(#[ts(as = "String")] Decimal);

impl Discount {
    /// No discount.
    pub const ZERO: Discount = Discount(Decimal::ZERO);

    /// The whole price (100% off).
    pub const FULL: Discount = Discount(Decimal::ONE);

    /// Wraps a fraction without range checks.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Discount(value)
    }

    /// Wraps a fraction, rejecting anything outside [0, 1).
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::Discount;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(Discount::try_new("discount", Decimal::new(25, 2)).is_ok());
    /// assert!(Discount::try_new("discount", Decimal::ONE).is_err());
    /// assert!(Discount::try_new("discount", Decimal::new(-1, 2)).is_err());
    /// ```
    pub fn try_new(field: &str, value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO || value >= Decimal::ONE {
            return Err(ValidationError::DiscountOutOfRange {
                field: field.to_string(),
                value,
            });
        }
        Ok(Discount(value))
    }

    /// Creates a discount from a percentage (`12.5` → `0.125`).
    pub fn from_percentage(pct: Decimal) -> Self {
        Discount(pct / Decimal::ONE_HUNDRED)
    }

    /// Returns the raw fraction.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the multiplier left after the discount: `1 − d`.
    #[inline]
    pub fn factor(&self) -> Decimal {
        Decimal::ONE - self.0
    }

    /// Returns the discount as a percentage (`0.125` → `12.5`).
    #[inline]
    pub fn percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// Checks if no discount applies.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks for the degenerate 100% discount.
    ///
    /// Any inverse computation must skip the division when this is true.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.0 == Decimal::ONE
    }

    /// Composes two successive discounts into one: `d₁ + d₂ − d₁·d₂`.
    ///
    /// Equivalent to `1 − (1 − d₁)(1 − d₂)` and commutative. Zero on either
    /// side returns the other discount unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::Discount;
    /// use rust_decimal::Decimal;
    ///
    /// let a = Discount::new(Decimal::new(20, 2));
    /// let b = Discount::new(Decimal::new(10, 2));
    /// assert_eq!(a.compose(b), b.compose(a));
    /// assert_eq!(a.compose(b).value(), Decimal::new(28, 2));
    /// ```
    pub fn compose(self, other: Discount) -> Discount {
        match (self.is_zero(), other.is_zero()) {
            (true, _) => other,
            (_, true) => self,
            _ => Discount(self.0 + other.0 - self.0 * other.0),
        }
    }

    /// Returns `Some(self)` unless the discount is zero.
    ///
    /// Lets call sites treat "zero" and "unset" identically.
    #[inline]
    pub fn non_zero(self) -> Option<Discount> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Default discount is zero.
impl Default for Discount {
    fn default() -> Self {
        Discount::ZERO
    }
}

/// Display as the raw fraction. Use [`crate::annotation::format_percentage`]
/// for human-readable output.
impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Discount {
    fn from(value: Decimal) -> Self {
        Discount(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Pricing Configuration
//!
//! Precision and formatting settings consumed by the calculator.
//!
//! This is a plain data type. Loading it from a file or the environment is
//! the job of `discount-hooks`; the core only reads it.
//!
//! ## Field Precision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field                        Digits (default)                          │
//! │  ───────────────────────────  ──────────────────────────────────────    │
//! │  unit_price                   price_digits          (4)                 │
//! │  gross_unit_price             price_digits          (4)                 │
//! │  gross_unit_price_wo_round    price + discount      (8)                 │
//! │  discount, contract_discount  discount_digits       (4)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Largest scale a 96-bit decimal can carry.
pub const MAX_TOTAL_DIGITS: u32 = 28;

// =============================================================================
// Rounding
// =============================================================================

/// Rounding mode applied when a value is quantized to a field's precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Rounding {
    /// Round half to even (bankers rounding), the decimal default.
    #[default]
    HalfEven,
    /// Round half away from zero.
    HalfUp,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// Rounds `value` to exactly `digits` decimal places.
    ///
    /// The result always carries `digits` as its scale, so `85.5` quantized
    /// to 2 digits displays as `85.50`.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::config::Rounding;
    /// use rust_decimal::Decimal;
    ///
    /// let v = Decimal::new(125, 3); // 0.125
    /// assert_eq!(Rounding::HalfEven.quantize(v, 2).to_string(), "0.12");
    /// assert_eq!(Rounding::HalfUp.quantize(v, 2).to_string(), "0.13");
    /// ```
    pub fn quantize(self, value: Decimal, digits: u32) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(digits, self.strategy());
        rounded.rescale(digits);
        rounded
    }
}

impl std::fmt::Display for Rounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rounding::HalfEven => write!(f, "half_even"),
            Rounding::HalfUp => write!(f, "half_up"),
        }
    }
}

impl std::str::FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half_even" | "bankers" => Ok(Rounding::HalfEven),
            "half_up" => Ok(Rounding::HalfUp),
            other => Err(format!(
                "Unknown rounding mode: '{}'. Valid options: half_even, half_up",
                other
            )),
        }
    }
}

// =============================================================================
// Annotation Style
// =============================================================================

/// How the effective discount is written onto invoice line descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnnotationStyle {
    /// Word placed before the percentage.
    #[serde(default = "default_label")]
    pub label: String,

    /// Separator between integer and fractional digits.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Separator between groups of three integer digits.
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,
}

fn default_label() -> String {
    "BONIFICACIÓN".to_string()
}

fn default_decimal_separator() -> char {
    ','
}

fn default_thousands_separator() -> char {
    '.'
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        AnnotationStyle {
            label: default_label(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

// =============================================================================
// Pricing Configuration
// =============================================================================

/// Precision settings for contract line prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingConfig {
    /// Digits of `unit_price` and `gross_unit_price`.
    #[serde(default = "default_price_digits")]
    pub price_digits: u32,

    /// Digits of every discount field.
    #[serde(default = "default_discount_digits")]
    pub discount_digits: u32,

    /// Rounding applied when quantizing.
    #[serde(default)]
    pub rounding: Rounding,

    /// Invoice annotation formatting.
    #[serde(default)]
    pub annotation: AnnotationStyle,
}

fn default_price_digits() -> u32 {
    4
}

fn default_discount_digits() -> u32 {
    4
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            price_digits: default_price_digits(),
            discount_digits: default_discount_digits(),
            rounding: Rounding::default(),
            annotation: AnnotationStyle::default(),
        }
    }
}

impl PricingConfig {
    /// Digits of `gross_unit_price_wo_round`.
    #[inline]
    pub fn extended_digits(&self) -> u32 {
        self.price_digits + self.discount_digits
    }

    /// Quantizes to unit/gross price precision.
    #[inline]
    pub fn round_price(&self, value: Decimal) -> Decimal {
        self.rounding.quantize(value, self.price_digits)
    }

    /// Quantizes to the extended gross precision.
    #[inline]
    pub fn round_extended(&self, value: Decimal) -> Decimal {
        self.rounding.quantize(value, self.extended_digits())
    }

    /// Checks that the extended precision fits the decimal mantissa.
    pub fn validate(&self) -> CoreResult<()> {
        if self.extended_digits() > MAX_TOTAL_DIGITS {
            return Err(CoreError::InvalidDigits {
                price_digits: self.price_digits,
                discount_digits: self.discount_digits,
                max: MAX_TOTAL_DIGITS,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.price_digits, 4);
        assert_eq!(config.discount_digits, 4);
        assert_eq!(config.extended_digits(), 8);
        assert_eq!(config.rounding, Rounding::HalfEven);
        assert_eq!(config.annotation.label, "BONIFICACIÓN");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quantize_pads_scale() {
        assert_eq!(Rounding::HalfEven.quantize(dec!(85.5), 2).to_string(), "85.50");
        assert_eq!(Rounding::HalfEven.quantize(dec!(100), 4).to_string(), "100.0000");
    }

    #[test]
    fn test_half_even_vs_half_up() {
        assert_eq!(Rounding::HalfEven.quantize(dec!(2.345), 2), dec!(2.34));
        assert_eq!(Rounding::HalfUp.quantize(dec!(2.345), 2), dec!(2.35));
        assert_eq!(Rounding::HalfEven.quantize(dec!(2.355), 2), dec!(2.36));
    }

    #[test]
    fn test_rounding_parsing() {
        assert_eq!("half_even".parse::<Rounding>().unwrap(), Rounding::HalfEven);
        assert_eq!("HALF_UP".parse::<Rounding>().unwrap(), Rounding::HalfUp);
        assert!("ceiling".parse::<Rounding>().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_digits() {
        let config = PricingConfig {
            price_digits: 20,
            discount_digits: 10,
            ..PricingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidDigits { .. })
        ));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: PricingConfig = serde_json::from_str(r#"{"price_digits": 2}"#).unwrap();
        assert_eq!(config.price_digits, 2);
        assert_eq!(config.discount_digits, 4);
        assert_eq!(config.annotation.decimal_separator, ',');
    }
}

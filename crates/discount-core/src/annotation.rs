//! # Invoice Annotation
//!
//! Writes the effective discount of a contract line onto the invoice line
//! generated from it.
//!
//! ## Why Annotate?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Contract line:  gross 50.00, contract discount 20%  →  net 40.00       │
//! │                                                                         │
//! │  Invoice line:                                                          │
//! │    description   "Hosting BONIFICACIÓN 20%"                             │
//! │    unit_price    40.00                                                  │
//! │    gross         40.00   (invoice shows the net as its own gross)       │
//! │    discount      0                                                      │
//! │                                                                         │
//! │  The invoice carries one net price; the discount survives as text.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::discount::Discount;
use crate::types::{ContractLine, InvoiceLine};

/// Single discount equivalent to the line and contract discounts together.
///
/// - both apply: `1 − (1 − line)(1 − contract)`
/// - contract only: `contract`
/// - line only: `line`
pub fn effective_discount(line: Discount, contract: Discount) -> Discount {
    match (line.non_zero(), contract.non_zero()) {
        (Some(line), Some(contract)) => {
            Discount::new(Decimal::ONE - line.factor() * contract.factor())
        }
        (None, Some(contract)) => contract,
        (Some(line), None) => line,
        (None, None) => Discount::ZERO,
    }
}

/// Renders a discount as a percentage for display.
///
/// Rounded to `discount_digits − 2` places (a 4-digit fraction is a
/// 2-digit percentage), trailing zeros dropped, separators taken from the
/// configured annotation style.
///
/// ## Example
/// ```rust
/// use discount_core::annotation::format_percentage;
/// use discount_core::{Discount, PricingConfig};
/// use rust_decimal::Decimal;
///
/// let config = PricingConfig::default();
/// assert_eq!(format_percentage(Discount::new(Decimal::new(20, 2)), &config), "20");
/// assert_eq!(format_percentage(Discount::new(Decimal::new(145, 3)), &config), "14,5");
/// ```
pub fn format_percentage(discount: Discount, config: &PricingConfig) -> String {
    let places = config.discount_digits.saturating_sub(2);
    let pct = config
        .rounding
        .quantize(discount.percentage(), places)
        .normalize();

    let style = &config.annotation;
    let digits = pct.abs().to_string();
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::new();
    if pct.is_sign_negative() && !pct.is_zero() {
        out.push('-');
    }
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(style.thousands_separator);
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push(style.decimal_separator);
        out.push_str(fraction);
    }
    out
}

/// Annotates `invoice_line` with the discount of `contract_line`.
///
/// No-op when the contract line has no gross price or its gross price
/// equals the invoice line's net price. Otherwise the invoice line's
/// gross becomes its own rounded net price, its discount becomes 0, and
/// `" <label> <pct>%"` is appended to the description.
///
/// Returns `true` if an annotation was appended.
pub fn annotate_invoice_line(
    invoice_line: &mut InvoiceLine,
    contract_line: &ContractLine,
    contract_discount: Discount,
    config: &PricingConfig,
) -> bool {
    let Some(gross) = contract_line.gross_unit_price else {
        return false;
    };
    if gross == invoice_line.unit_price {
        return false;
    }

    invoice_line.gross_unit_price = Some(config.round_price(invoice_line.unit_price));
    invoice_line.discount = Discount::ZERO;

    let effective = effective_discount(contract_line.discount, contract_discount);
    if effective.is_zero() {
        return false;
    }

    invoice_line.description.push_str(&format!(
        " {} {}%",
        config.annotation.label,
        format_percentage(effective, config)
    ));
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

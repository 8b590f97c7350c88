//! # Pricing Module
//!
//! Net price from gross price and successive discounts, and the inverse.
//!
//! ## Recompute Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross_unit_price ──► × (1 − line) ──► × (1 − contract) ──► unit (raw)  │
//! │                                                               │         │
//! │                           combined = line ∘ contract          │         │
//! │                                        │                      │         │
//! │                                        ▼                      ▼         │
//! │               wo_round = unit (raw) / (1 − combined)   round(price)     │
//! │                    │                                          │         │
//! │       ┌────────────┴───────────┐                               │         │
//! │       ▼                        ▼                               ▼         │
//! │  round(extended)         round(price)                     unit_price    │
//! │  gross_unit_price_wo_round  gross_unit_price                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The inverse is taken from the *unrounded* net price, so feeding the
//! result back in reproduces the same three fields (idempotence).
//!
//! ## Usage
//! ```rust
//! use discount_core::{recompute_prices, ContractLine, Discount, PricingConfig};
//! use rust_decimal::Decimal;
//!
//! let config = PricingConfig { price_digits: 2, ..PricingConfig::default() };
//! let line = ContractLine::new("Hosting")
//!     .with_gross_unit_price(Decimal::new(10000, 2))      // 100.00
//!     .with_discount(Discount::new(Decimal::new(10, 2))); // 10%
//!
//! let prices = recompute_prices(&line, Discount::new(Decimal::new(5, 2)), &config).unwrap();
//! assert_eq!(prices.unit_price, Some(Decimal::new(8550, 2)));         // 85.50
//! assert_eq!(prices.gross_unit_price, Some(Decimal::new(10000, 2)));  // 100.00
//! ```

use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::discount::Discount;
use crate::error::{CoreError, CoreResult};
use crate::types::{ContractLine, LinePrices};

// =============================================================================
// Forward: gross → net
// =============================================================================

/// Recomputes the derived prices of `line`.
///
/// `contract_discount` is the already-resolved contract-level discount
/// (see [`crate::DiscountSources::resolve`]); pass [`Discount::ZERO`] when
/// none applies.
///
/// ## Behavior
/// - Gross price unset: nothing to compute, `unit_price` becomes `None`.
/// - Zero discounts are skipped (multiplying by 1).
/// - A combined 100% discount yields a zero net price and keeps the gross
///   price as the extended value instead of dividing by zero.
pub fn recompute_prices(
    line: &ContractLine,
    contract_discount: Discount,
    config: &PricingConfig,
) -> CoreResult<LinePrices> {
    let Some(gross) = line.gross_unit_price else {
        return Ok(LinePrices {
            gross_unit_price: None,
            gross_unit_price_wo_round: None,
            unit_price: None,
        });
    };

    let line_discount = line.discount.non_zero();
    let contract_discount = contract_discount.non_zero();

    let mut unit = gross;
    for discount in [line_discount, contract_discount].into_iter().flatten() {
        unit = unit
            .checked_mul(discount.factor())
            .ok_or(CoreError::ArithmeticOverflow {
                operation: "unit price",
            })?;
    }

    let combined = line_discount
        .unwrap_or_default()
        .compose(contract_discount.unwrap_or_default());

    let wo_round = if combined.is_zero() || combined.is_full() {
        gross
    } else {
        unit.checked_div(combined.factor())
            .ok_or(CoreError::ArithmeticOverflow {
                operation: "gross unit price",
            })?
    };

    Ok(LinePrices {
        gross_unit_price: Some(config.round_price(wo_round)),
        gross_unit_price_wo_round: Some(config.round_extended(wo_round)),
        unit_price: Some(config.round_price(unit)),
    })
}

/// Recomputes and writes the result back onto `line`.
///
/// Returns `true` if any of the three price fields changed.
pub fn recompute_in_place(
    line: &mut ContractLine,
    contract_discount: Discount,
    config: &PricingConfig,
) -> CoreResult<bool> {
    let prices = recompute_prices(line, contract_discount, config)?;
    let changed = prices != line.prices();
    line.apply(prices);
    Ok(changed)
}

// =============================================================================
// Inverse: net → gross
// =============================================================================

/// A gross price back-derived from a net price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedGross {
    /// Gross rounded to price precision (unchanged net if no discount).
    pub rounded: Decimal,
    /// Gross before rounding.
    pub exact: Decimal,
}

/// Back-derives the gross price that yields `net` after the discounts.
///
/// Divides by `(1 − line)` then `(1 − contract)`, mirroring the order of
/// the forward multiplications. Discounts equal to 1 are skipped. The
/// result is rounded to price precision only when it differs from `net`.
///
/// ## Example
/// ```rust
/// use discount_core::{derive_gross_from_net, Discount, PricingConfig};
/// use rust_decimal::Decimal;
///
/// let config = PricingConfig { price_digits: 2, ..PricingConfig::default() };
/// let gross = derive_gross_from_net(
///     Decimal::new(4000, 2),                     // 40.00 net
///     None,
///     Some(Discount::new(Decimal::new(20, 2))),  // 20% contract discount
///     &config,
/// )
/// .unwrap();
/// assert_eq!(gross, Decimal::new(5000, 2));      // 50.00 gross
/// ```
pub fn derive_gross_from_net(
    net: Decimal,
    line_discount: Option<Discount>,
    contract_discount: Option<Discount>,
    config: &PricingConfig,
) -> CoreResult<Decimal> {
    derive_gross_from_net_exact(net, line_discount, contract_discount, config).map(|g| g.rounded)
}

/// Same as [`derive_gross_from_net`], also returning the unrounded value.
pub fn derive_gross_from_net_exact(
    net: Decimal,
    line_discount: Option<Discount>,
    contract_discount: Option<Discount>,
    config: &PricingConfig,
) -> CoreResult<DerivedGross> {
    let mut gross = net;
    for discount in [line_discount, contract_discount].into_iter().flatten() {
        if discount.is_full() {
            continue;
        }
        gross = gross
            .checked_div(discount.factor())
            .ok_or(CoreError::ArithmeticOverflow {
                operation: "gross from net",
            })?;
    }

    let rounded = if gross != net {
        config.round_price(gross)
    } else {
        gross
    };
    Ok(DerivedGross {
        rounded,
        exact: gross,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn two_digits() -> PricingConfig {
        PricingConfig {
            price_digits: 2,
            ..PricingConfig::default()
        }
    }

    fn line(gross: Option<Decimal>, discount: Decimal) -> ContractLine {
        let mut line = ContractLine::new("Hosting").with_discount(Discount::new(discount));
        line.gross_unit_price = gross;
        line
    }

    #[test]
    fn test_line_and_contract_discount() {
        let prices = recompute_prices(
            &line(Some(dec!(100.00)), dec!(0.10)),
            Discount::new(dec!(0.05)),
            &two_digits(),
        )
        .unwrap();

        assert_eq!(prices.unit_price, Some(dec!(85.50)));
        assert_eq!(prices.gross_unit_price, Some(dec!(100.00)));
        assert_eq!(prices.gross_unit_price_wo_round, Some(dec!(100.00)));
        assert_eq!(prices.unit_price.unwrap().to_string(), "85.50");
    }

    #[test]
    fn test_contract_discount_only() {
        let prices = recompute_prices(
            &line(Some(dec!(50.00)), dec!(0)),
            Discount::new(dec!(0.20)),
            &two_digits(),
        )
        .unwrap();
        assert_eq!(prices.unit_price, Some(dec!(40.00)));
        assert_eq!(prices.gross_unit_price, Some(dec!(50.00)));
    }

    #[test]
    fn test_gross_unset_is_noop() {
        let prices = recompute_prices(
            &line(None, dec!(0.10)),
            Discount::new(dec!(0.05)),
            &two_digits(),
        )
        .unwrap();
        assert_eq!(prices, LinePrices::default());
    }

    #[test]
    fn test_no_discount_keeps_gross() {
        let prices =
            recompute_prices(&line(Some(dec!(12.34)), dec!(0)), Discount::ZERO, &two_digits())
                .unwrap();
        assert_eq!(prices.unit_price, Some(dec!(12.34)));
        assert_eq!(prices.gross_unit_price_wo_round, Some(dec!(12.34)));
    }

    #[test]
    fn test_full_discount_does_not_divide() {
        let prices =
            recompute_prices(&line(Some(dec!(80.00)), dec!(1)), Discount::ZERO, &two_digits())
                .unwrap();
        assert_eq!(prices.unit_price, Some(dec!(0)));
        assert_eq!(prices.gross_unit_price_wo_round, Some(dec!(80.00)));

        let prices = recompute_prices(
            &line(Some(dec!(80.00)), dec!(0.25)),
            Discount::FULL,
            &two_digits(),
        )
        .unwrap();
        assert_eq!(prices.unit_price, Some(dec!(0)));
        assert_eq!(prices.gross_unit_price, Some(dec!(80.00)));
    }

    #[test]
    fn test_unit_price_rounds_half_even() {
        // 10.05 × 0.5 = 5.025 → 5.02 (half to even)
        let prices =
            recompute_prices(&line(Some(dec!(10.05)), dec!(0.5)), Discount::ZERO, &two_digits())
                .unwrap();
        assert_eq!(prices.unit_price, Some(dec!(5.02)));
        assert_eq!(prices.gross_unit_price, Some(dec!(10.05)));
    }

    #[test]
    fn test_extended_precision_keeps_inverse() {
        let config = PricingConfig::default();
        let prices =
            recompute_prices(&line(Some(dec!(33.3333)), dec!(0.3333)), Discount::ZERO, &config)
                .unwrap();
        // 33.3333 × 0.6667 = 22.22331111
        assert_eq!(prices.unit_price, Some(dec!(22.2233)));
        assert_eq!(prices.gross_unit_price_wo_round.unwrap().scale(), 8);
        assert_eq!(prices.gross_unit_price_wo_round, Some(dec!(33.3333)));
    }

    #[test]
    fn test_recompute_in_place_reports_change() {
        let config = two_digits();
        let mut l = line(Some(dec!(100)), dec!(0.10));
        assert!(recompute_in_place(&mut l, Discount::ZERO, &config).unwrap());
        assert_eq!(l.unit_price, Some(dec!(90.00)));
        assert!(!recompute_in_place(&mut l, Discount::ZERO, &config).unwrap());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let config = two_digits();
        let result = derive_gross_from_net(
            Decimal::MAX,
            Some(Discount::new(dec!(0.9999))),
            None,
            &config,
        );
        assert!(matches!(result, Err(CoreError::ArithmeticOverflow { .. })));
    }

    #[test]
    fn test_derive_gross_from_net() {
        let config = two_digits();
        let gross = derive_gross_from_net(
            dec!(85.50),
            Some(Discount::new(dec!(0.10))),
            Some(Discount::new(dec!(0.05))),
            &config,
        )
        .unwrap();
        assert_eq!(gross, dec!(100.00));
    }

    #[test]
    fn test_derive_gross_without_discount_is_unrounded() {
        let config = two_digits();
        let derived = derive_gross_from_net_exact(dec!(9.999), None, None, &config).unwrap();
        assert_eq!(derived.rounded, dec!(9.999));
        assert_eq!(derived.exact, dec!(9.999));
    }

    #[test]
    fn test_derive_gross_skips_full_discount() {
        let config = two_digits();
        let gross =
            derive_gross_from_net(dec!(10), Some(Discount::FULL), None, &config).unwrap();
        assert_eq!(gross, dec!(10));
    }

    #[test]
    fn test_derive_gross_rounds_repeating_results() {
        let config = two_digits();
        let derived = derive_gross_from_net_exact(
            dec!(10),
            Some(Discount::new(dec!(0.3))),
            None,
            &config,
        )
        .unwrap();
        // 10 / 0.7 = 14.2857...
        assert_eq!(derived.rounded, dec!(14.29));
        assert!(derived.exact > dec!(14.2857) && derived.exact < dec!(14.2858));
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn cents() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000).prop_map(|c| Decimal::new(c, 2))
    }

    fn discount(max_bps: i64) -> impl Strategy<Value = Discount> {
        (0i64..=max_bps).prop_map(|bps| Discount::new(Decimal::new(bps, 4)))
    }

    proptest! {
        #[test]
        fn prop_unit_price_matches_formula(
            gross in cents(),
            d1 in discount(9_999),
            d2 in discount(9_999)
        ) {
            let config = PricingConfig::default();
            let prices = recompute_prices(&line(Some(gross), d1.value()), d2, &config).unwrap();
            let expected = config.round_price(gross * d1.factor() * d2.factor());
            prop_assert_eq!(prices.unit_price, Some(expected));
        }

        #[test]
        fn prop_recompute_is_idempotent(
            gross in cents(),
            d1 in discount(9_999),
            d2 in discount(9_999)
        ) {
            let config = PricingConfig::default();
            let mut l = line(Some(gross), d1.value());
            let first = recompute_prices(&l, d2, &config).unwrap();
            prop_assert_eq!(first, recompute_prices(&l, d2, &config).unwrap());

            l.apply(first);
            let second = recompute_prices(&l, d2, &config).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_inverse_within_one_unit(
            gross in cents(),
            d1 in discount(2_500),
            d2 in discount(2_500)
        ) {
            let config = PricingConfig::default();
            let l = line(Some(gross), d1.value());
            let net = recompute_prices(&l, d2, &config).unwrap().unit_price.unwrap();
            let back = derive_gross_from_net(net, Some(d1), Some(d2), &config).unwrap();
            prop_assert!((back - gross).abs() <= dec!(0.0001), "gross {} back {}", gross, back);
        }

        #[test]
        fn prop_discount_order_does_not_matter(
            gross in cents(),
            d1 in discount(9_999),
            d2 in discount(9_999)
        ) {
            let config = PricingConfig::default();
            prop_assert_eq!(d1.compose(d2), d2.compose(d1));
            let a = recompute_prices(&line(Some(gross), d1.value()), d2, &config).unwrap();
            let b = recompute_prices(&line(Some(gross), d2.value()), d1, &config).unwrap();
            prop_assert_eq!(a.unit_price, b.unit_price);
        }

        #[test]
        fn prop_full_discount_never_fails(gross in cents(), d in discount(9_999)) {
            let config = PricingConfig::default();
            let prices = recompute_prices(&line(Some(gross), dec!(1)), d, &config).unwrap();
            prop_assert_eq!(prices.unit_price, Some(config.round_price(Decimal::ZERO)));
            prop_assert_eq!(prices.gross_unit_price_wo_round, Some(config.round_extended(gross)));
        }
    }
}

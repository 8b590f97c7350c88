//! # Lifecycle Hooks
//!
//! Entry points the host calls when contract lines and contracts change.
//!
//! ## Hook Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Host event                    Hook                     Effect          │
//! │  ──────────                    ────                     ──────          │
//! │                                                                         │
//! │  line created ───────────────► on_create() ───────────► gross derived   │
//! │                                                         or recomputed   │
//! │                                                                         │
//! │  line written ───────────────► on_write() ────────────► patch applied,  │
//! │                                                         recomputed      │
//! │                                                                         │
//! │  field edited in a form ─────► on_change() ───────────► preview prices  │
//! │                                                                         │
//! │  contract discount written ──► on_contract_discount_ ─► every line of   │
//! │                                change()                 the contract    │
//! │                                                         recomputed      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hooks validate their inputs (the host field boundary) and then call the
//! pure calculator in `discount-core`.

use discount_core::pricing::{derive_gross_from_net_exact, recompute_in_place};
use discount_core::validation::{validate_discount, validate_entity_id, validate_optional_price};
use discount_core::{
    effective_discount, recompute_prices, Contract, ContractLine, Discount, DiscountSources,
    LinePrices, PricingConfig, ValidationError,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DiscountConfig;
use crate::error::HookResult;

// =============================================================================
// Hook Inputs
// =============================================================================

/// Field values supplied when a contract line is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewContractLine {
    pub contract_id: Option<String>,
    pub sale_discount: Option<Discount>,
    pub description: String,
    pub gross_unit_price: Option<Decimal>,
    pub discount: Option<Discount>,
    pub unit_price: Option<Decimal>,
}

/// A partial write to a contract line. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChanges {
    pub description: Option<String>,
    pub sale_discount: Option<Discount>,
    pub gross_unit_price: Option<Decimal>,
    pub discount: Option<Discount>,
    pub unit_price: Option<Decimal>,
}

impl LineChanges {
    fn touches_pricing(&self) -> bool {
        self.sale_discount.is_some()
            || self.gross_unit_price.is_some()
            || self.discount.is_some()
            || self.unit_price.is_some()
    }
}

/// Field whose change notification is being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Description,
    GrossUnitPrice,
    Discount,
    SaleDiscount,
    ContractDiscount,
}

impl LineField {
    fn affects_prices(self) -> bool {
        !matches!(self, LineField::Description)
    }
}

// =============================================================================
// Pricing Hooks
// =============================================================================

/// Lifecycle hooks for contract lines and contracts.
#[derive(Debug, Clone, Default)]
pub struct PricingHooks {
    config: PricingConfig,
}

impl PricingHooks {
    /// Creates hooks with the given precision settings.
    pub fn new(config: PricingConfig) -> Self {
        PricingHooks { config }
    }

    /// Creates hooks from a loaded [`DiscountConfig`].
    pub fn from_config(config: &DiscountConfig) -> Self {
        Self::new(config.pricing.clone())
    }

    /// Returns the precision settings.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Handles creation of a contract line.
    ///
    /// ## Field Resolution
    /// - gross price supplied: net price recomputed from it
    /// - only net price supplied: net rounded to price digits, gross
    ///   back-derived from it, extended gross set to the unrounded inverse
    /// - neither: gross price 0
    ///
    /// The discount defaults to 0.
    pub fn on_create(
        &self,
        draft: NewContractLine,
        sources: DiscountSources<'_>,
    ) -> HookResult<ContractLine> {
        let discount = draft.discount.unwrap_or_default();
        validate_discount("discount", discount)?;
        if let Some(sale_discount) = draft.sale_discount {
            validate_discount("sale_discount", sale_discount)?;
        }
        validate_optional_price("gross_unit_price", draft.gross_unit_price)?;
        validate_optional_price("unit_price", draft.unit_price)?;
        if let Some(contract_id) = draft.contract_id.as_deref() {
            validate_entity_id("contract_id", contract_id)?;
        }

        let mut line = ContractLine {
            id: uuid::Uuid::new_v4().to_string(),
            contract_id: draft.contract_id,
            sale_discount: draft.sale_discount,
            description: draft.description,
            gross_unit_price: draft.gross_unit_price,
            gross_unit_price_wo_round: None,
            discount,
            unit_price: draft.unit_price,
        };
        let contract_discount = sources.resolve(&line);

        match (draft.gross_unit_price, draft.unit_price) {
            (None, Some(net)) => {
                let net = self.config.round_price(net);
                line.unit_price = Some(net);
                let derived = derive_gross_from_net_exact(
                    net,
                    Some(line.discount),
                    Some(contract_discount),
                    &self.config,
                )?;
                line.gross_unit_price = Some(derived.rounded);
                line.gross_unit_price_wo_round = Some(self.config.round_extended(derived.exact));
            }
            (gross, _) => {
                line.gross_unit_price = Some(gross.unwrap_or(Decimal::ZERO));
                recompute_in_place(&mut line, contract_discount, &self.config)?;
            }
        }

        debug!(
            id = %line.id,
            gross = ?line.gross_unit_price,
            unit_price = ?line.unit_price,
            discount = %line.discount,
            contract_discount = %contract_discount,
            "Created contract line"
        );
        Ok(line)
    }

    /// Handles a write to an existing contract line.
    ///
    /// The patch is validated and applied atomically: on error `line` is
    /// left untouched. Writing `unit_price` directly is only allowed while
    /// no discount is in effect, and then resets the gross price to it.
    ///
    /// Returns `true` if any price field changed.
    pub fn on_write(
        &self,
        line: &mut ContractLine,
        changes: LineChanges,
        sources: DiscountSources<'_>,
    ) -> HookResult<bool> {
        if let Some(discount) = changes.discount {
            validate_discount("discount", discount)?;
        }
        if let Some(sale_discount) = changes.sale_discount {
            validate_discount("sale_discount", sale_discount)?;
        }
        validate_optional_price("gross_unit_price", changes.gross_unit_price)?;
        validate_optional_price("unit_price", changes.unit_price)?;

        let touches_pricing = changes.touches_pricing();
        let mut updated = line.clone();
        if let Some(description) = changes.description {
            updated.description = description;
        }
        if let Some(discount) = changes.discount {
            updated.discount = discount;
        }
        if let Some(sale_discount) = changes.sale_discount {
            updated.sale_discount = Some(sale_discount);
        }
        if let Some(gross) = changes.gross_unit_price {
            updated.gross_unit_price = Some(gross);
        }

        let contract_discount = sources.resolve(&updated);
        if let Some(net) = changes.unit_price {
            if !effective_discount(updated.discount, contract_discount).is_zero() {
                return Err(ValidationError::ReadOnly {
                    field: "unit_price".to_string(),
                }
                .into());
            }
            if changes.gross_unit_price.is_none() {
                updated.gross_unit_price = Some(net);
            }
        }

        let changed = if touches_pricing {
            recompute_in_place(&mut updated, contract_discount, &self.config)?
        } else {
            false
        };

        debug!(
            id = %updated.id,
            changed,
            unit_price = ?updated.unit_price,
            "Wrote contract line"
        );
        *line = updated;
        Ok(changed)
    }

    /// Previews the prices a form should show after `field` changed.
    ///
    /// Does not modify `line`.
    pub fn on_change(
        &self,
        line: &ContractLine,
        field: LineField,
        sources: DiscountSources<'_>,
    ) -> HookResult<LinePrices> {
        if !field.affects_prices() {
            return Ok(line.prices());
        }
        let contract_discount = sources.resolve(line);
        let prices = recompute_prices(line, contract_discount, &self.config)?;
        debug!(id = %line.id, ?field, unit_price = ?prices.unit_price, "Previewed line prices");
        Ok(prices)
    }

    /// Stores a new contract discount and recomputes that contract's lines.
    ///
    /// Lines of other contracts in `lines` are skipped. Each line is
    /// recomputed independently with `new_discount` as explicit override.
    /// All prices are computed before anything is stored: on error neither
    /// `contract` nor `lines` change.
    ///
    /// Returns the number of lines recomputed.
    pub fn on_contract_discount_change(
        &self,
        contract: &mut Contract,
        new_discount: Discount,
        lines: &mut [ContractLine],
    ) -> HookResult<usize> {
        validate_discount("contract_discount", new_discount)?;

        let sources = DiscountSources::from_contract(contract).with_context_discount(new_discount);
        let mut pending = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            if sources.linked_contract(line).is_none() {
                continue;
            }
            let prices = recompute_prices(line, sources.resolve(line), &self.config)?;
            pending.push((index, prices));
        }

        let recomputed = pending.len();
        for (index, prices) in pending {
            lines[index].apply(prices);
        }
        contract.contract_discount = new_discount;

        info!(
            contract_id = %contract.id,
            contract_discount = %new_discount,
            recomputed,
            "Recomputed contract lines after discount change"
        );
        Ok(recomputed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

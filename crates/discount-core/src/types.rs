//! # Domain Types
//!
//! Field tuples of the host entities that carry discount data.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────────┐   ┌────────────────┐  │
//! │  │    Contract      │   │    ContractLine      │   │  Consumption   │  │
//! │  │  ──────────────  │ 1 │  ──────────────────  │ 1 │  ────────────  │  │
//! │  │  id              │◄──┤  contract_id         │◄──┤  line id       │  │
//! │  │  party_id        │ * │  gross_unit_price    │ * │  quantity      │  │
//! │  │  contract_disc.  │   │  gross_..._wo_round  │   │  invoice_date  │  │
//! │  └──────────────────┘   │  discount            │   └───────┬────────┘  │
//! │                         │  unit_price          │           │           │
//! │                         └──────────────────────┘           ▼           │
//! │                                                   ┌────────────────┐   │
//! │                                                   │  InvoiceLine   │   │
//! │                                                   └────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the fields relevant to pricing live here. Everything else about
//! these entities belongs to the host framework.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::Discount;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Contract
// =============================================================================

/// A customer contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contract {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable contract number.
    pub reference: Option<String>,

    /// Party being invoiced.
    pub party_id: String,

    /// Discount layered after each line's own discount.
    #[serde(default)]
    pub contract_discount: Discount,
}

impl Contract {
    /// Creates a contract with a fresh id and no discount.
    pub fn new(party_id: impl Into<String>) -> Self {
        Contract {
            id: uuid::Uuid::new_v4().to_string(),
            reference: None,
            party_id: party_id.into(),
            contract_discount: Discount::ZERO,
        }
    }
}

// =============================================================================
// Contract Line
// =============================================================================

/// A priced line of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContractLine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning contract, if already linked.
    pub contract_id: Option<String>,

    /// Discount of the sale this line originated from, if any.
    #[serde(default)]
    pub sale_discount: Option<Discount>,

    /// Text copied onto invoice lines.
    #[serde(default)]
    pub description: String,

    /// Price before any discount, at price precision.
    #[ts(as = "Option<String>")]
    pub gross_unit_price: Option<Decimal>,

    /// Exact inverse of the net price at extended precision. Derived.
    #[ts(as = "Option<String>")]
    pub gross_unit_price_wo_round: Option<Decimal>,

    /// The line's own discount.
    #[serde(default)]
    pub discount: Discount,

    /// Net price charged. Derived once a gross price is known.
    #[ts(as = "Option<String>")]
    pub unit_price: Option<Decimal>,
}

impl ContractLine {
    /// Creates an unpriced line with a fresh id.
    pub fn new(description: impl Into<String>) -> Self {
        ContractLine {
            id: uuid::Uuid::new_v4().to_string(),
            contract_id: None,
            sale_discount: None,
            description: description.into(),
            gross_unit_price: None,
            gross_unit_price_wo_round: None,
            discount: Discount::ZERO,
            unit_price: None,
        }
    }

    /// Sets the gross price (builder style).
    pub fn with_gross_unit_price(mut self, price: Decimal) -> Self {
        self.gross_unit_price = Some(price);
        self
    }

    /// Sets the line discount (builder style).
    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = discount;
        self
    }

    /// Links the line to a contract (builder style).
    pub fn with_contract(mut self, contract: &Contract) -> Self {
        self.contract_id = Some(contract.id.clone());
        self
    }

    /// Copies recomputed prices onto the line.
    ///
    /// Touches exactly the three derived fields and nothing else.
    pub fn apply(&mut self, prices: LinePrices) {
        self.gross_unit_price = prices.gross_unit_price;
        self.gross_unit_price_wo_round = prices.gross_unit_price_wo_round;
        self.unit_price = prices.unit_price;
    }

    /// Current values of the three derived fields.
    pub fn prices(&self) -> LinePrices {
        LinePrices {
            gross_unit_price: self.gross_unit_price,
            gross_unit_price_wo_round: self.gross_unit_price_wo_round,
            unit_price: self.unit_price,
        }
    }
}

// =============================================================================
// Line Prices
// =============================================================================

/// Output of a price recompute: the three fields it is allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinePrices {
    #[ts(as = "Option<String>")]
    pub gross_unit_price: Option<Decimal>,
    #[ts(as = "Option<String>")]
    pub gross_unit_price_wo_round: Option<Decimal>,
    #[ts(as = "Option<String>")]
    pub unit_price: Option<Decimal>,
}

// =============================================================================
// Discount Sources
// =============================================================================

/// Everything that can supply the contract-level discount of a line.
///
/// ## Precedence
/// ```text
/// explicit override ──► contract.contract_discount ──► line.sale_discount ──► 0
///    (highest)                                                             (lowest)
/// ```
/// The override replaces the ambient transaction context the host used to
/// carry: callers pass it explicitly, e.g. while a contract's discount is
/// being rewritten and the stored value is not yet the new one.
///
/// The contract only counts for lines linked to it through `contract_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountSources<'a> {
    /// Explicit contract-level discount for this call.
    pub context_discount: Option<Discount>,

    /// The line's contract, if loaded. Ignored for lines of other contracts.
    pub contract: Option<&'a Contract>,
}

impl<'a> DiscountSources<'a> {
    /// No override and no contract.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sources from a loaded contract.
    pub fn from_contract(contract: &'a Contract) -> Self {
        DiscountSources {
            context_discount: None,
            contract: Some(contract),
        }
    }

    /// Adds an explicit override.
    pub fn with_context_discount(mut self, discount: Discount) -> Self {
        self.context_discount = Some(discount);
        self
    }

    /// Resolves the contract-level discount for `line`.
    pub fn resolve(&self, line: &ContractLine) -> Discount {
        self.context_discount
            .or_else(|| self.linked_contract(line).map(|c| c.contract_discount))
            .or(line.sale_discount)
            .unwrap_or_default()
    }

    /// The loaded contract, if `line` belongs to it.
    pub fn linked_contract(&self, line: &ContractLine) -> Option<&'a Contract> {
        self.contract
            .filter(|c| line.contract_id.as_deref() == Some(c.id.as_str()))
    }
}

// =============================================================================
// Contract Consumption
// =============================================================================

/// A billable usage event of a contract line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContractConsumption {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Line being consumed.
    pub contract_line_id: String,

    /// Contract the line belongs to.
    pub contract_id: String,

    /// First day of the consumed period.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last day of the consumed period.
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Date the consumption is invoiced on.
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,

    /// Quantity consumed.
    #[ts(as = "String")]
    pub quantity: Decimal,
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice line generated from a consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceLine {
    /// Consumption this line bills.
    pub consumption_id: String,

    /// Description, possibly carrying a discount annotation.
    pub description: String,

    #[ts(as = "String")]
    pub quantity: Decimal,

    /// Net price charged.
    #[ts(as = "String")]
    pub unit_price: Decimal,

    /// Gross price shown on the invoice.
    #[ts(as = "Option<String>")]
    pub gross_unit_price: Option<Decimal>,

    /// Discount shown on the invoice.
    #[serde(default)]
    pub discount: Discount,
}

impl InvoiceLine {
    /// Line amount before taxes.
    pub fn amount(&self) -> CoreResult<Decimal> {
        self.quantity
            .checked_mul(self.unit_price)
            .ok_or(CoreError::ArithmeticOverflow {
                operation: "quantity × unit price",
            })
    }
}

/// A draft invoice grouping the lines of one contract and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub contract_id: String,
    pub party_id: String,
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Sum of line amounts before taxes.
    pub fn untaxed_amount(&self) -> CoreResult<Decimal> {
        self.lines.iter().try_fold(Decimal::ZERO, |total, line| {
            total
                .checked_add(line.amount()?)
                .ok_or(CoreError::ArithmeticOverflow {
                    operation: "invoice total",
                })
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

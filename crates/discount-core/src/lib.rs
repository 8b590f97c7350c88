//! # discount-core: Pure Discount Pricing for Contract Lines
//!
//! This crate contains the discount arithmetic of the contract/billing
//! extension as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Contract Discount Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host framework (entities, storage)              │   │
//! │  │    on create / on write / on change / invoice generation        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          discount-hooks (lifecycle dispatch, invoicing)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ discount-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │ discount  │  │  pricing  │  │ annotation │  │ validation│  │   │
//! │  │   │ Discount  │  │ recompute │  │ BONIFIC... │  │   rules   │  │   │
//! │  │   │ compose   │  │ inverse   │  │ percentage │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO LOGGING • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`discount`] - `Discount` fraction type and composition
//! - [`pricing`] - Recompute net price, back-derive gross price
//! - [`annotation`] - Effective discount text on invoice lines
//! - [`types`] - Contract, line, consumption and invoice field tuples
//! - [`config`] - Precision, rounding and annotation style
//! - [`validation`] - Field validation for the host boundary
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, re-running a recompute
//!    reproduces its own result
//! 2. **Decimal Only**: every price and discount is a `rust_decimal::Decimal`
//! 3. **Explicit Context**: the contract-level discount is a parameter, never
//!    ambient state
//! 4. **Explicit Errors**: overflow is a typed error, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use discount_core::{recompute_prices, ContractLine, Discount, PricingConfig};
//! use rust_decimal::Decimal;
//!
//! let config = PricingConfig::default();
//! let line = ContractLine::new("Maintenance")
//!     .with_gross_unit_price(Decimal::new(5000, 2)); // 50.00
//!
//! let prices = recompute_prices(&line, Discount::new(Decimal::new(20, 2)), &config).unwrap();
//! assert_eq!(prices.unit_price, Some(Decimal::new(4000, 2))); // 40.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod annotation;
pub mod config;
pub mod discount;
pub mod error;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use annotation::{annotate_invoice_line, effective_discount};
pub use config::{PricingConfig, Rounding};
pub use discount::Discount;
pub use error::{CoreError, CoreResult, ValidationError};
pub use pricing::{derive_gross_from_net, recompute_in_place, recompute_prices};
pub use types::*;

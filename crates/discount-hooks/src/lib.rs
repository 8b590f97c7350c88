//! # discount-hooks: Host Bindings for Contract Discounts
//!
//! The host framework's entity lifecycle calls into this crate; this crate
//! validates field input and delegates the arithmetic to `discount-core`.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         discount-hooks                                  │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   lifecycle     │  │   invoicing     │  │   config                │ │
//! │  │  PricingHooks   │  │   Invoicer      │  │   DiscountConfig        │ │
//! │  │  on_create      │  │   consumption   │  │   TOML + environment    │ │
//! │  │  on_write       │  │   → invoice     │  │                         │ │
//! │  │  on_change      │  │   line + text   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   telemetry     │  │   error         │                              │
//! │  │  init_tracing   │  │   HookError     │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use discount_core::{Contract, Discount, DiscountSources};
//! use discount_hooks::{NewContractLine, PricingHooks};
//! use rust_decimal::Decimal;
//!
//! let hooks = PricingHooks::default();
//! let mut contract = Contract::new("party-1");
//! contract.contract_discount = Discount::new(Decimal::new(20, 2));
//!
//! let line = hooks
//!     .on_create(
//!         NewContractLine {
//!             contract_id: Some(contract.id.clone()),
//!             gross_unit_price: Some(Decimal::new(5000, 2)),
//!             ..Default::default()
//!         },
//!         DiscountSources::from_contract(&contract),
//!     )
//!     .unwrap();
//! assert_eq!(line.unit_price, Some(Decimal::new(4000, 2)));
//! ```

pub mod config;
pub mod error;
pub mod invoicing;
pub mod lifecycle;
pub mod telemetry;

pub use config::DiscountConfig;
pub use error::{HookError, HookResult};
pub use invoicing::Invoicer;
pub use lifecycle::{LineChanges, LineField, NewContractLine, PricingHooks};
pub use telemetry::init_tracing;

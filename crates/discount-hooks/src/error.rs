//! # Hook Error Types
//!
//! Error types for lifecycle and invoicing operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Pricing      │  │     Invoicing           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Core           │  │  UnknownContractLine    │ │
//! │  │  Io             │  │  (validation,   │  │  UnknownContract        │ │
//! │  │  Toml*          │  │   overflow)     │  │  ContractMismatch       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use discount_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for hook operations.
pub type HookResult<T> = Result<T, HookError>;

/// Errors returned to the host framework.
#[derive(Debug, Error)]
pub enum HookError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are inconsistent.
    #[error("Invalid discount configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Config file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`crate::config::DiscountConfig`].
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // =========================================================================
    // Pricing Errors
    // =========================================================================
    /// Calculator or field validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Invoicing Errors
    // =========================================================================
    /// Consumption references a line that was not supplied.
    #[error("Contract line not found: {0}")]
    UnknownContractLine(String),

    /// Consumption references a contract that was not supplied.
    #[error("Contract not found: {0}")]
    UnknownContract(String),

    /// Consumption's contract differs from its line's contract.
    #[error("Consumption {consumption_id} is for contract {expected} but its line belongs to {actual}")]
    ContractMismatch {
        consumption_id: String,
        expected: String,
        actual: String,
    },
}

impl From<ValidationError> for HookError {
    fn from(err: ValidationError) -> Self {
        HookError::Core(CoreError::Validation(err))
    }
}

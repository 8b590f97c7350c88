//! # Discount Configuration
//!
//! Loads the [`PricingConfig`] the hooks run with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CONTRACT_DISCOUNT_PRICE_DIGITS=2                                   │
//! │     CONTRACT_DISCOUNT_ROUNDING=half_up                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/contract-discount/discount.toml (Linux)                  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     4 price digits, 4 discount digits, half-even, "BONIFICACIÓN"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! price_digits = 4
//! discount_digits = 4
//! rounding = "half_even"
//!
//! [pricing.annotation]
//! label = "BONIFICACIÓN"
//! decimal_separator = ","
//! thousands_separator = "."
//! ```

use discount_core::validation::validate_digits;
use discount_core::{PricingConfig, Rounding};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{HookError, HookResult};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "CONTRACT_DISCOUNT_";

/// Complete hook configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountConfig {
    /// Precision and annotation settings.
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl DiscountConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (discount.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> HookResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading discount config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load discount config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> HookResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| HookError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Discount config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> HookResult<()> {
        let pricing = &self.pricing;
        validate_digits("price_digits", pricing.price_digits)?;
        validate_digits("discount_digits", pricing.discount_digits)?;
        pricing.validate()?;

        if pricing.annotation.label.trim().is_empty() {
            return Err(HookError::InvalidConfig(
                "annotation label must not be empty".into(),
            ));
        }

        if pricing.annotation.decimal_separator == pricing.annotation.thousands_separator {
            return Err(HookError::InvalidConfig(format!(
                "decimal and thousands separators are both '{}'",
                pricing.annotation.decimal_separator
            )));
        }

        Ok(())
    }

    /// Applies overrides looked up by full variable name.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(value) = var("PRICE_DIGITS") {
            match value.parse::<u32>() {
                Ok(digits) => {
                    debug!(digits, "Overriding price digits from environment");
                    self.pricing.price_digits = digits;
                }
                Err(_) => warn!(value = %value, "Ignoring non-numeric price digits"),
            }
        }

        if let Some(value) = var("DISCOUNT_DIGITS") {
            match value.parse::<u32>() {
                Ok(digits) => {
                    debug!(digits, "Overriding discount digits from environment");
                    self.pricing.discount_digits = digits;
                }
                Err(_) => warn!(value = %value, "Ignoring non-numeric discount digits"),
            }
        }

        if let Some(value) = var("ROUNDING") {
            match value.parse::<Rounding>() {
                Ok(rounding) => {
                    debug!(%rounding, "Overriding rounding from environment");
                    self.pricing.rounding = rounding;
                }
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(label) = var("LABEL") {
            self.pricing.annotation.label = label;
        }

        if let Some(value) = var("DECIMAL_SEPARATOR") {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(sep), None) => self.pricing.annotation.decimal_separator = sep,
                _ => warn!(value = %value, "Decimal separator must be a single character"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "contract", "contract-discount")
            .map(|dirs| dirs.config_dir().join("discount.toml"))
    }
}

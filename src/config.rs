use crate::{CURRENCY_PRECISION, MAX_AMOUNT};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ledger-wide settings.
///
/// Every field has a default, so a JSON document only needs to name the settings it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    amount_policy: AmountPolicy,
    // Extracted records above this (in either direction) fail their batch
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    max_amount: Decimal,
    currency_symbol: String,
    display_precision: u32,
}

/// What to do with a negative amount in an extraction result.
///
/// Manual expenses are always validated. Extracted amounts come from a model reading a
/// screenshot, so there is no single right answer here.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    /// Keep the amount exactly as extracted
    PassThrough,
    /// Replace negative amounts with zero
    Clamp,
    /// Fail the whole batch
    Reject,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid ledger configuration")]
    Parse(#[from] serde_json::Error),
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            amount_policy: AmountPolicy::default(),
            max_amount: MAX_AMOUNT,
            currency_symbol: "৳".into(),
            display_precision: CURRENCY_PRECISION,
        }
    }
}

impl Default for AmountPolicy {
    fn default() -> Self {
        AmountPolicy::Reject
    }
}

impl LedgerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        debug!("loaded ledger configuration: {:?}", config);
        Ok(config)
    }

    pub fn with_amount_policy(&mut self, policy: AmountPolicy) -> &mut Self {
        self.amount_policy = policy;
        self
    }

    /// Set the largest amount an extracted record may carry.
    ///
    /// The bound cannot be raised past the ledger-wide limit, which keeps totals in range.
    pub fn with_max_amount(&mut self, max_amount: Decimal) -> &mut Self {
        self.max_amount = max_amount.abs().min(MAX_AMOUNT);
        self
    }

    pub fn with_currency_symbol<S: Into<String>>(&mut self, symbol: S) -> &mut Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_display_precision(&mut self, precision: u32) -> &mut Self {
        self.display_precision = precision;
        self
    }

    pub fn amount_policy(&self) -> AmountPolicy {
        self.amount_policy
    }

    pub fn max_amount(&self) -> Decimal {
        self.max_amount.abs().min(MAX_AMOUNT)
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn display_precision(&self) -> u32 {
        self.display_precision
    }
}

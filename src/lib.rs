//! Earnings ledger for delivery riders.
//!
//! Transactions read from a rider's statement by an external extraction service are
//! normalized into a fixed set of categories and kept alongside hand-entered expenses.
//! `Session::totals` turns both into the figures a rider cares about: what they earned,
//! how much cash they are holding for the platform, what they spent and what they keep.

mod category;
mod config;
mod expense;
mod extraction;
mod format;
mod session;
mod totals;
mod transaction;

pub use category::{normalize, TransactionCategory};
pub use config::{AmountPolicy, ConfigError, LedgerConfig};
pub use expense::{Expense, ExpenseError, ExpenseId, ExpenseStore};
pub use extraction::{
    extract, normalize_batch, parse_candidates, ExtractionError, ExtractionGateway,
    ExtractionRequest, GatewayError, RawTransaction, StatementInput, USER_MESSAGE,
};
pub use format::{format_amount, summary_lines};
pub use session::Session;
pub use totals::{compute_totals, LedgerTotals};
pub use transaction::{StoredTransaction, Transaction, TransactionKey, TransactionStore};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

// This represents the number of decimal places that a currency can validly express.
// @todo Support the full range of currency precisions specified in ISO 4217.
const CURRENCY_PRECISION: u32 = 2;

// The largest amount a single record may carry. Far beyond any real statement line, but
// small enough that summing every record a session could hold stays inside `Decimal`.
const MAX_AMOUNT: Decimal = dec!(1000000000000);

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("could not extract transactions")]
    Extraction(#[from] ExtractionError),
    #[error("invalid expense")]
    Expense(#[from] ExpenseError),
    #[error("could not load configuration")]
    Config(#[from] ConfigError),
}

impl LedgerError {
    /// Message suitable for showing to the rider
    pub fn user_message(&self) -> String {
        match self {
            LedgerError::Extraction(e) => e.user_message().to_owned(),
            LedgerError::Expense(e) => e.to_string(),
            LedgerError::Config(e) => e.to_string(),
        }
    }
}

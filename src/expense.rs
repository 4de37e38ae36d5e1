use crate::MAX_AMOUNT;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

/// A cost the rider entered by hand, e.g. fuel or a phone top-up.
///
/// The only way to build an `Expense` is through `Expense::new`, which validates its
/// input. An invalid `Expense` cannot exist.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Expense {
    id: ExpenseId,
    description: String,
    amount: Decimal,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct ExpenseId(Uuid);

#[derive(Error, Debug, Eq, PartialEq)]
pub enum ExpenseError {
    #[error("an expense needs a description")]
    EmptyDescription,
    #[error("expense amounts must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("expense amounts cannot exceed {1} (got {0})")]
    AmountTooLarge(Decimal, Decimal),
    #[error("'{0}' is not a valid amount")]
    UnparseableAmount(String),
}

/// Ordered, in-memory collection of expenses.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    records: Vec<Expense>,
}

impl Expense {
    pub fn new<S: Into<String>>(description: S, amount: Decimal) -> Result<Self, ExpenseError> {
        let description = description.into();

        if description.trim().is_empty() {
            return Err(ExpenseError::EmptyDescription);
        }

        if amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount(amount));
        }

        if amount > MAX_AMOUNT {
            return Err(ExpenseError::AmountTooLarge(amount, MAX_AMOUNT));
        }

        Ok(Expense {
            id: ExpenseId(Uuid::new_v4()),
            description,
            amount,
        })
    }

    /// Parse an amount typed into a form field.
    ///
    /// Only the number is parsed here; positivity is checked by `Expense::new`.
    pub fn parse_amount(input: &str) -> Result<Decimal, ExpenseError> {
        Decimal::from_str(input.trim())
            .map_err(|_| ExpenseError::UnparseableAmount(input.to_owned()))
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ExpenseStore {
    pub fn new() -> Self {
        ExpenseStore::default()
    }

    /// Validate and record a new expense, returning its ID.
    ///
    /// Nothing is stored if validation fails.
    pub fn append<S: Into<String>>(
        &mut self,
        description: S,
        amount: Decimal,
    ) -> Result<ExpenseId, ExpenseError> {
        let expense = Expense::new(description, amount).map_err(|e| {
            warn!("rejected expense: {}", e);
            e
        })?;

        Ok(self.append_expense(expense))
    }

    pub fn append_expense(&mut self, expense: Expense) -> ExpenseId {
        let id = expense.id;

        debug!(
            "recording expense {} '{}' of {}",
            id, expense.description, expense.amount
        );

        self.records.push(expense);
        id
    }

    /// Remove the expense with this ID, returning it. Unknown IDs are ignored.
    pub fn remove(&mut self, id: &ExpenseId) -> Option<Expense> {
        let position = self.records.iter().position(|e| &e.id == id)?;
        debug!("removing expense {}", id);
        Some(self.records.remove(position))
    }

    pub fn clear(&mut self) {
        debug!("clearing {} expenses", self.records.len());
        self.records.clear();
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.records.iter().find(|e| &e.id == id)
    }

    /// Every stored expense in insertion order
    pub fn all(&self) -> &[Expense] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

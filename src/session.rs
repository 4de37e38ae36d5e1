use crate::{
    config::LedgerConfig,
    expense::{Expense, ExpenseError, ExpenseId, ExpenseStore},
    extraction::ExtractionError,
    totals::{compute_totals, LedgerTotals},
    transaction::{Transaction, TransactionKey, TransactionStore},
};
use log::{debug, error, warn};
use rust_decimal::Decimal;

/// The rider's working ledger.
///
/// A `Session` owns both stores. Everything else gets read-only access through it. An
/// extraction runs outside the session (see `extraction::extract`) and its result is
/// handed back through `complete_extraction`, so expenses can still be entered while an
/// upload is being read.
#[derive(Debug, Default)]
pub struct Session {
    config: LedgerConfig,
    transactions: TransactionStore,
    expenses: ExpenseStore,
    pending_extractions: usize,
    last_error: Option<String>,
}

impl Session {
    pub fn new(config: LedgerConfig) -> Self {
        Session {
            config,
            ..Session::default()
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Note that an upload has been sent for extraction.
    pub fn begin_extraction(&mut self) {
        self.pending_extractions += 1;
        self.last_error = None;
        debug!("{} extraction(s) outstanding", self.pending_extractions);
    }

    /// Apply the outcome of an extraction.
    ///
    /// A successful batch is appended in one go. A failure records the rider-facing
    /// message and leaves both stores as they were.
    pub fn complete_extraction(
        &mut self,
        result: Result<Vec<Transaction>, ExtractionError>,
    ) -> Option<Vec<TransactionKey>> {
        if self.pending_extractions == 0 {
            warn!("extraction completed without a matching begin_extraction");
        }
        self.pending_extractions = self.pending_extractions.saturating_sub(1);

        match result {
            Ok(batch) => Some(self.transactions.append(batch)),
            Err(e) => {
                error!("discarding failed extraction: {}", e);
                self.last_error = Some(e.user_message().to_owned());
                None
            }
        }
    }

    /// Whether any extraction is still outstanding
    pub fn is_loading(&self) -> bool {
        self.pending_extractions > 0
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn add_expense<S: Into<String>>(
        &mut self,
        description: S,
        amount: Decimal,
    ) -> Result<ExpenseId, ExpenseError> {
        self.expenses.append(description, amount)
    }

    pub fn remove_transaction(&mut self, key: &TransactionKey) -> Option<Transaction> {
        self.transactions.remove(key)
    }

    pub fn remove_expense(&mut self, id: &ExpenseId) -> Option<Expense> {
        self.expenses.remove(id)
    }

    /// Empty both stores. The caller is responsible for confirming this with the rider.
    pub fn clear_all(&mut self) {
        self.transactions.clear();
        self.expenses.clear();
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn expenses(&self) -> &ExpenseStore {
        &self.expenses
    }

    pub fn totals(&self) -> LedgerTotals {
        compute_totals(self.transactions.transactions(), self.expenses.all())
    }
}

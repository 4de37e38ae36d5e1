use crate::category::TransactionCategory;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;
use std::ops::Deref;

/// A normalized transaction taken from a rider's statement.
///
/// `Transaction`s are only created from extraction output once the free-form type label
/// has been mapped onto a `TransactionCategory`. They are never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transaction {
    // The date is whatever the statement printed. We display it but never parse it.
    date: String,
    category: TransactionCategory,
    external_id: String,
    amount: Decimal,
}

/// Identifies a single stored transaction.
///
/// Statements can repeat an external ID (e.g. the same screenshot uploaded twice), so the
/// ID alone is ambiguous. The store pairs it with the insertion index it assigned.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct TransactionKey {
    external_id: String,
    index: u64,
}

/// A transaction as held by the `TransactionStore`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredTransaction {
    key: TransactionKey,
    transaction: Transaction,
}

/// Ordered, in-memory collection of transactions.
#[derive(Debug, Default)]
pub struct TransactionStore {
    records: Vec<StoredTransaction>,
    // Insertion indexes are never reused, otherwise a stale key could remove the wrong
    // record after an earlier removal.
    next_index: u64,
}

impl Transaction {
    pub fn new<D, I>(date: D, category: TransactionCategory, external_id: I, amount: Decimal) -> Self
    where
        D: Into<String>,
        I: Into<String>,
    {
        Transaction {
            date: date.into(),
            category,
            external_id: external_id.into(),
            amount,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> TransactionCategory {
        self.category
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl TransactionKey {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn index(&self) -> u64 {
        self.index
    }
}

impl StoredTransaction {
    pub fn key(&self) -> &TransactionKey {
        &self.key
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }
}

impl Deref for StoredTransaction {
    type Target = Transaction;

    fn deref(&self) -> &Self::Target {
        &self.transaction
    }
}

impl TransactionStore {
    pub fn new() -> Self {
        TransactionStore::default()
    }

    /// Add a batch of transactions to the end of the store, keeping their order.
    ///
    /// The batch is applied in full within this call. Returns the keys assigned to the
    /// new records, in batch order.
    pub fn append<B>(&mut self, batch: B) -> Vec<TransactionKey>
    where
        B: IntoIterator<Item = Transaction>,
    {
        let batch = batch.into_iter();
        let mut keys = Vec::with_capacity(batch.size_hint().0);

        for transaction in batch {
            let key = TransactionKey {
                external_id: transaction.external_id.clone(),
                index: self.next_index,
            };
            self.next_index += 1;

            keys.push(key.clone());
            self.records.push(StoredTransaction { key, transaction });
        }

        debug!(
            "appended {} transactions ({} total)",
            keys.len(),
            self.records.len()
        );

        keys
    }

    /// Remove the transaction with this key, returning it.
    ///
    /// Unknown keys are ignored.
    pub fn remove(&mut self, key: &TransactionKey) -> Option<Transaction> {
        let position = self.records.iter().position(|r| &r.key == key)?;
        let removed = self.records.remove(position);

        debug!(
            "removed transaction {} (index {})",
            key.external_id, key.index
        );

        Some(removed.transaction)
    }

    pub fn clear(&mut self) {
        debug!("clearing {} transactions", self.records.len());
        self.records.clear();
    }

    pub fn get(&self, key: &TransactionKey) -> Option<&Transaction> {
        self.records
            .iter()
            .find(|r| &r.key == key)
            .map(|r| &r.transaction)
    }

    /// Every stored transaction in insertion order
    pub fn all(&self) -> &[StoredTransaction] {
        &self.records
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.records.iter().map(|r| &r.transaction)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

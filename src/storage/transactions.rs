//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json and keeps
//! in-memory indexes by payment target, category and parent installment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ParcelaError;
use crate::models::{CategoryId, DateRange, OwnerId, PaymentTarget, Transaction, TransactionId};

use super::file_io::{read_json, stage_json, StagedFile};
use super::{read_guard, write_guard};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

#[derive(Default)]
struct Indexes {
    by_target: HashMap<PaymentTarget, Vec<TransactionId>>,
    by_category: HashMap<CategoryId, Vec<TransactionId>>,
    by_parent: HashMap<TransactionId, Vec<TransactionId>>,
}

impl Indexes {
    fn build(data: &HashMap<TransactionId, Transaction>) -> Self {
        let mut indexes = Self::default();
        for txn in data.values() {
            indexes.add(txn);
        }
        indexes
    }

    fn add(&mut self, txn: &Transaction) {
        self.by_target.entry(txn.target).or_default().push(txn.id);
        self.by_category.entry(txn.category_id).or_default().push(txn.id);
        if let Some(parent_id) = txn.parent_id {
            self.by_parent.entry(parent_id).or_default().push(txn.id);
        }
    }

    fn remove(&mut self, txn: &Transaction) {
        if let Some(ids) = self.by_target.get_mut(&txn.target) {
            ids.retain(|&id| id != txn.id);
        }
        if let Some(ids) = self.by_category.get_mut(&txn.category_id) {
            ids.retain(|&id| id != txn.id);
        }
        if let Some(parent_id) = txn.parent_id {
            if let Some(ids) = self.by_parent.get_mut(&parent_id) {
                ids.retain(|&id| id != txn.id);
            }
        }
    }
}

/// Newest first: date descending, then creation time descending
fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.installment_number.cmp(&a.installment_number))
    });
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    indexes: RwLock<Indexes>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            indexes: RwLock::new(Indexes::default()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), ParcelaError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let loaded: HashMap<_, _> = file_data
            .transactions
            .into_iter()
            .map(|txn| (txn.id, txn))
            .collect();

        self.restore(loaded)
    }

    pub fn stage(&self) -> Result<StagedFile, ParcelaError> {
        let data = read_guard(&self.data)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);

        stage_json(&self.path, &TransactionData { transactions })
    }

    pub fn snapshot(&self) -> Result<HashMap<TransactionId, Transaction>, ParcelaError> {
        Ok(read_guard(&self.data)?.clone())
    }

    /// Replace the in-memory state and rebuild the indexes
    pub fn restore(&self, snapshot: HashMap<TransactionId, Transaction>) -> Result<(), ParcelaError> {
        let mut data = write_guard(&self.data)?;
        let mut indexes = write_guard(&self.indexes)?;

        *indexes = Indexes::build(&snapshot);
        *data = snapshot;
        Ok(())
    }

    /// Get a transaction by ID, provided it belongs to `owner`
    pub fn get(&self, owner: OwnerId, id: TransactionId) -> Result<Option<Transaction>, ParcelaError> {
        let data = read_guard(&self.data)?;
        Ok(data.get(&id).filter(|t| t.owner_id == owner).cloned())
    }

    /// Every transaction of an owner, newest first
    pub fn list(&self, owner: OwnerId) -> Result<Vec<Transaction>, ParcelaError> {
        let data = read_guard(&self.data)?;

        let mut transactions: Vec<_> = data
            .values()
            .filter(|t| t.owner_id == owner)
            .cloned()
            .collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Transactions of an owner dated inside `range`, newest first
    pub fn in_range(&self, owner: OwnerId, range: DateRange) -> Result<Vec<Transaction>, ParcelaError> {
        let mut transactions = self.list(owner)?;
        transactions.retain(|t| range.contains(t.date));
        Ok(transactions)
    }

    /// Installments 2..N of a split purchase, in installment order
    pub fn children_of(&self, parent_id: TransactionId) -> Result<Vec<Transaction>, ParcelaError> {
        let data = read_guard(&self.data)?;
        let indexes = read_guard(&self.indexes)?;

        let mut children: Vec<_> = indexes
            .by_parent
            .get(&parent_id)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default();
        children.sort_by_key(|t| t.installment_number);
        Ok(children)
    }

    /// Whether any transaction is posted to this account or card
    pub fn references_target(&self, target: PaymentTarget) -> Result<bool, ParcelaError> {
        let indexes = read_guard(&self.indexes)?;
        Ok(indexes.by_target.get(&target).is_some_and(|ids| !ids.is_empty()))
    }

    /// Whether any transaction is filed under this category
    pub fn references_category(&self, category_id: CategoryId) -> Result<bool, ParcelaError> {
        let indexes = read_guard(&self.indexes)?;
        Ok(indexes
            .by_category
            .get(&category_id)
            .is_some_and(|ids| !ids.is_empty()))
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), ParcelaError> {
        let mut data = write_guard(&self.data)?;
        let mut indexes = write_guard(&self.indexes)?;

        if let Some(old) = data.get(&txn.id) {
            indexes.remove(old);
        }
        indexes.add(&txn);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, ParcelaError> {
        let mut data = write_guard(&self.data)?;
        let mut indexes = write_guard(&self.indexes)?;

        match data.remove(&id) {
            Some(txn) => {
                indexes.remove(&txn);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn count(&self) -> Result<usize, ParcelaError> {
        Ok(read_guard(&self.data)?.len())
    }
}

//! Storage layer for Parcela
//!
//! JSON file storage with atomic multi-file commits. Mutations run inside
//! [`Storage::atomically`]: the in-memory repositories are snapshotted, the
//! closure runs, and every data file is staged and renamed into place. Any
//! failure restores the snapshot and leaves the files untouched.

pub mod accounts;
pub mod categories;
pub mod credit_cards;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use credit_cards::CreditCardRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, seed_owner};
pub use transactions::TransactionRepository;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::ParcelaPaths;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, CreditCard, CreditCardId, OwnerId, Transaction,
    TransactionId,
};

pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> ParcelaResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| ParcelaError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> ParcelaResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| ParcelaError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// In-memory copy of every repository, taken at the start of a unit of work
struct Snapshot {
    accounts: HashMap<AccountId, Account>,
    credit_cards: HashMap<CreditCardId, CreditCard>,
    categories: HashMap<CategoryId, Category>,
    transactions: HashMap<TransactionId, Transaction>,
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: ParcelaPaths,
    pub accounts: AccountRepository,
    pub credit_cards: CreditCardRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
    /// Entries recorded by the unit of work in progress; `None` outside one
    pending_audit: RwLock<Option<Vec<AuditEntry>>>,
    /// Audit writes that failed after their data had been committed
    audit_failures: RwLock<Vec<String>>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: ParcelaPaths) -> ParcelaResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            credit_cards: CreditCardRepository::new(paths.credit_cards_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            pending_audit: RwLock::new(None),
            audit_failures: RwLock::new(Vec::new()),
            paths,
        })
    }

    /// Open storage and load everything from disk
    pub fn open(paths: ParcelaPaths) -> ParcelaResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &ParcelaPaths {
        &self.paths
    }

    pub fn audit_log(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> ParcelaResult<()> {
        self.accounts.load()?;
        self.credit_cards.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk; either every file is replaced or none is
    pub fn save_all(&self) -> ParcelaResult<()> {
        file_io::write_all_atomic(vec![
            self.accounts.stage(),
            self.credit_cards.stage(),
            self.categories.stage(),
            self.transactions.stage(),
        ])
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Run `work` as one unit: commit every change it makes, or none of them
    ///
    /// Nested calls join the outer unit. Once the data files are committed
    /// the unit succeeds even if the audit log cannot be written; that
    /// failure is kept for [`Storage::take_audit_warnings`].
    pub fn atomically<T, F>(&self, work: F) -> ParcelaResult<T>
    where
        F: FnOnce(&Storage) -> ParcelaResult<T>,
    {
        let snapshot = {
            let mut pending = write_guard(&self.pending_audit)?;
            if pending.is_some() {
                drop(pending);
                return work(self);
            }
            // the unit only opens once there is something to roll back to
            let snapshot = self.snapshot()?;
            *pending = Some(Vec::new());
            snapshot
        };

        let result = work(self).and_then(|value| self.save_all().map(|_| value));
        let entries = self
            .pending_audit
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_default();

        match result {
            Ok(value) => {
                if let Err(e) = self.audit.log_batch(&entries) {
                    self.note_audit_failure(e);
                }
                Ok(value)
            }
            Err(e) => {
                self.restore(snapshot)?;
                Err(e)
            }
        }
    }

    fn note_audit_failure(&self, err: ParcelaError) {
        self.audit_failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err.to_string());
    }

    /// Drain the audit failures recorded since the last call
    pub fn take_audit_warnings(&self) -> Vec<String> {
        std::mem::take(&mut *self.audit_failures.write().unwrap_or_else(PoisonError::into_inner))
    }

    fn snapshot(&self) -> ParcelaResult<Snapshot> {
        Ok(Snapshot {
            accounts: self.accounts.snapshot()?,
            credit_cards: self.credit_cards.snapshot()?,
            categories: self.categories.snapshot()?,
            transactions: self.transactions.snapshot()?,
        })
    }

    fn restore(&self, snapshot: Snapshot) -> ParcelaResult<()> {
        self.accounts.restore(snapshot.accounts)?;
        self.credit_cards.restore(snapshot.credit_cards)?;
        self.categories.restore(snapshot.categories)?;
        self.transactions.restore(snapshot.transactions)?;
        Ok(())
    }

    fn record(&self, entry: AuditEntry) -> ParcelaResult<()> {
        let mut pending = write_guard(&self.pending_audit)?;
        match pending.as_mut() {
            Some(entries) => {
                entries.push(entry);
                Ok(())
            }
            None => {
                drop(pending);
                self.audit.log(&entry)
            }
        }
    }

    /// Audit a newly created entity
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        owner: OwnerId,
        entity_name: Option<String>,
        entity: &T,
    ) -> ParcelaResult<()> {
        self.record(AuditEntry::create(
            entity_type,
            entity_id,
            owner,
            entity_name,
            entity,
        ))
    }

    /// Audit a modified entity
    #[allow(clippy::too_many_arguments)]
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        owner: OwnerId,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> ParcelaResult<()> {
        self.record(AuditEntry::update(
            entity_type,
            entity_id,
            owner,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    /// Audit a removed entity
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        owner: OwnerId,
        entity_name: Option<String>,
        entity: &T,
    ) -> ParcelaResult<()> {
        self.record(AuditEntry::delete(
            entity_type,
            entity_id,
            owner,
            entity_name,
            entity,
        ))
    }
}

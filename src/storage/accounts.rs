//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ParcelaError;
use crate::models::{Account, AccountId, OwnerId};

use super::file_io::{read_json, stage_json, StagedFile};
use super::{read_guard, write_guard};

/// Serializable account data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), ParcelaError> {
        let file_data: AccountData = read_json(&self.path)?;
        let mut data = write_guard(&self.data)?;

        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    /// Write accounts to their temp file, ready to be committed
    pub fn stage(&self) -> Result<StagedFile, ParcelaError> {
        let data = read_guard(&self.data)?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        stage_json(&self.path, &AccountData { accounts })
    }

    /// Copy of the in-memory state
    pub fn snapshot(&self) -> Result<HashMap<AccountId, Account>, ParcelaError> {
        Ok(read_guard(&self.data)?.clone())
    }

    /// Replace the in-memory state with a snapshot
    pub fn restore(&self, snapshot: HashMap<AccountId, Account>) -> Result<(), ParcelaError> {
        *write_guard(&self.data)? = snapshot;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.data.write().unwrap();
            panic!("panicked while holding the accounts lock");
        }));
    }

    /// Get an account by ID, provided it belongs to `owner`
    pub fn get(&self, owner: OwnerId, id: AccountId) -> Result<Option<Account>, ParcelaError> {
        let data = read_guard(&self.data)?;
        Ok(data.get(&id).filter(|a| a.owner_id == owner).cloned())
    }

    /// All accounts of an owner, sorted by name
    pub fn list(&self, owner: OwnerId) -> Result<Vec<Account>, ParcelaError> {
        let data = read_guard(&self.data)?;

        let mut accounts: Vec<_> = data
            .values()
            .filter(|a| a.owner_id == owner)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(accounts)
    }

    /// Find an account by name (case-insensitive)
    pub fn find_by_name(&self, owner: OwnerId, name: &str) -> Result<Option<Account>, ParcelaError> {
        let data = read_guard(&self.data)?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|a| a.owner_id == owner && a.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert or update an account
    pub fn upsert(&self, account: Account) -> Result<(), ParcelaError> {
        write_guard(&self.data)?.insert(account.id, account);
        Ok(())
    }

    /// Delete an account
    pub fn delete(&self, id: AccountId) -> Result<bool, ParcelaError> {
        Ok(write_guard(&self.data)?.remove(&id).is_some())
    }

    /// Number of stored accounts across all owners
    pub fn count(&self) -> Result<usize, ParcelaError> {
        Ok(read_guard(&self.data)?.len())
    }
}

//! Account service
//!
//! CRUD for bank accounts. Balances move through the ledger; `set_balance`
//! is the explicit manual correction.

use crate::audit::EntityType;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{Account, AccountId, Money, OwnerId, PaymentTarget};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account with an opening balance
    pub fn create(&self, owner: OwnerId, name: &str, opening_balance: Money) -> ParcelaResult<Account> {
        let account = Account::with_balance(owner, name.trim(), opening_balance);
        account
            .validate()
            .map_err(|e| ParcelaError::validation("name", e.to_string()))?;

        self.storage.atomically(|storage| {
            storage.accounts.upsert(account.clone())?;
            storage.log_create(
                EntityType::Account,
                account.id.full(),
                owner,
                Some(account.name.clone()),
                &account,
            )
        })?;

        Ok(account)
    }

    /// Get one of the owner's accounts
    pub fn get(&self, owner: OwnerId, id: AccountId) -> ParcelaResult<Account> {
        self.storage
            .accounts
            .get(owner, id)?
            .ok_or_else(|| ParcelaError::account_not_found(id.to_string()))
    }

    /// Find an account by name or ID string
    pub fn find(&self, owner: OwnerId, identifier: &str) -> ParcelaResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.find_by_name(owner, identifier)? {
            return Ok(Some(account));
        }

        match identifier.parse::<AccountId>() {
            Ok(id) => self.storage.accounts.get(owner, id),
            Err(_) => Ok(None),
        }
    }

    /// Like [`find`](Self::find), but a miss is an error
    pub fn resolve(&self, owner: OwnerId, identifier: &str) -> ParcelaResult<Account> {
        self.find(owner, identifier)?
            .ok_or_else(|| ParcelaError::account_not_found(identifier))
    }

    pub fn list(&self, owner: OwnerId) -> ParcelaResult<Vec<Account>> {
        self.storage.accounts.list(owner)
    }

    /// Sum of every account balance
    pub fn total_balance(&self, owner: OwnerId) -> ParcelaResult<Money> {
        Ok(self.list(owner)?.iter().map(|a| a.balance).sum())
    }

    /// Rename an account
    pub fn rename(&self, owner: OwnerId, id: AccountId, name: &str) -> ParcelaResult<Account> {
        let before = self.get(owner, id)?;
        let mut account = before.clone();
        account.name = name.trim().to_string();
        account.updated_at = chrono::Utc::now();
        account
            .validate()
            .map_err(|e| ParcelaError::validation("name", e.to_string()))?;

        self.save_update(owner, &before, &account, format!("name: {:?} -> {:?}", before.name, account.name))?;
        Ok(account)
    }

    /// Overwrite the running balance
    pub fn set_balance(&self, owner: OwnerId, id: AccountId, balance: Money) -> ParcelaResult<Account> {
        let before = self.get(owner, id)?;
        let mut account = before.clone();
        account.adjust_balance(balance - before.balance);

        self.save_update(owner, &before, &account, format!("balance: {} -> {}", before.balance, account.balance))?;
        Ok(account)
    }

    /// Delete an account nothing is posted to
    pub fn delete(&self, owner: OwnerId, id: AccountId) -> ParcelaResult<Account> {
        let account = self.get(owner, id)?;

        if self
            .storage
            .transactions
            .references_target(PaymentTarget::Account(id))?
        {
            return Err(ParcelaError::Conflict(format!(
                "Account '{}' has transactions and cannot be deleted",
                account.name
            )));
        }

        self.storage.atomically(|storage| {
            storage.accounts.delete(id)?;
            storage.log_delete(
                EntityType::Account,
                id.full(),
                owner,
                Some(account.name.clone()),
                &account,
            )
        })?;

        Ok(account)
    }

    fn save_update(&self, owner: OwnerId, before: &Account, after: &Account, diff: String) -> ParcelaResult<()> {
        self.storage.atomically(|storage| {
            storage.accounts.upsert(after.clone())?;
            storage.log_update(
                EntityType::Account,
                after.id.full(),
                owner,
                Some(after.name.clone()),
                before,
                after,
                Some(diff),
            )
        })
    }
}

//! Bank accounts
//!
//! Debit and Pix transactions draw from (or pay into) an account. The balance
//! is only ever moved by the ledger or by an explicit manual correction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::{AccountId, OwnerId};
use super::money::Money;

pub const MAX_ACCOUNT_NAME: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner_id: OwnerId,
    /// e.g. "Conta Corrente"
    pub name: String,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(owner_id: OwnerId, name: impl Into<String>) -> Self {
        Self::with_balance(owner_id, name, Money::zero())
    }

    pub fn with_balance(owner_id: OwnerId, name: impl Into<String>, balance: Money) -> Self {
        let created_at = Utc::now();
        Self {
            id: AccountId::new(),
            owner_id,
            name: name.into(),
            balance,
            created_at,
            updated_at: created_at,
        }
    }

    /// Apply a signed balance delta and bump `updated_at`
    pub fn adjust_balance(&mut self, delta: Money) {
        self.balance += delta;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), AccountValidationError> {
        let chars = self.name.trim().chars().count();
        match chars {
            0 => Err(AccountValidationError::EmptyName),
            n if n > MAX_ACCOUNT_NAME => Err(AccountValidationError::NameTooLong(n)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.balance)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    #[error("Account name cannot be empty")]
    EmptyName,
    #[error("Account name has {0} characters; the limit is 100")]
    NameTooLong(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_starts_at_zero() {
        let owner = OwnerId::new();
        let account = Account::new(owner, "Conta Corrente");
        assert_eq!(account.owner_id, owner);
        assert!(account.balance.is_zero());
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn test_adjust_balance_can_go_negative() {
        let mut account = Account::with_balance(OwnerId::new(), "Poupança", Money::from_cents(1000));
        let before = account.updated_at;

        account.adjust_balance(Money::from_cents(-3000));
        assert_eq!(account.balance.cents(), -2000);
        assert!(account.updated_at >= before);
    }

    #[test]
    fn test_name_rules() {
        let mut account = Account::new(OwnerId::new(), "Carteira");
        assert!(account.validate().is_ok());

        account.name = "   ".to_string();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));

        account.name = "ç".repeat(100);
        assert!(account.validate().is_ok());

        account.name = "a".repeat(101);
        assert_eq!(account.validate(), Err(AccountValidationError::NameTooLong(101)));
    }

    #[test]
    fn test_display() {
        let account = Account::with_balance(OwnerId::new(), "Carteira", Money::from_cents(1250));
        assert_eq!(account.to_string(), "Carteira (12.50)");
    }
}

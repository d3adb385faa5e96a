//! Category model
//!
//! Every transaction is filed under an income or expense category. The kind
//! decides which way the balance ledger moves an account or card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::ids::{CategoryId, OwnerId};

/// Whether a category records money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    /// Accepts English and Portuguese names, any case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "receita" => Some(Self::Income),
            "expense" | "despesa" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub owner_id: OwnerId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    /// Seeded for every owner; cannot be renamed or deleted
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(owner_id: OwnerId, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: CategoryId::new(),
            owner_id,
            name: name.into(),
            kind,
            is_default: false,
            created_at: Utc::now(),
        }
    }

    /// A seeded, read-only category
    pub fn default_for(owner_id: OwnerId, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            is_default: true,
            ..Self::new(owner_id, name, kind)
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == CategoryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == CategoryKind::Expense
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        match self.name.trim().chars().count() {
            0 => Err(CategoryValidationError::EmptyName),
            n if n > 100 => Err(CategoryValidationError::NameTooLong(n)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Categories every new owner starts with
pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &[
    "Salário",
    "Adiantamento",
    "PPR",
    "13º Salário",
    "Restituição de IR",
    "Outros",
];

pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &["Alimentação", "Combustível"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryValidationError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category name has {0} characters; the limit is 100")]
    NameTooLong(usize),
}

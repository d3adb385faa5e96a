//! Transaction model
//!
//! A transaction moves money on exactly one account or credit card. Credit
//! card purchases may be split into installments: installment 1 is the
//! parent record and installments 2..N are children pointing back at it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::billing;
use super::ids::{AccountId, CategoryId, CreditCardId, OwnerId, TransactionId};
use super::money::Money;

/// Most installments a credit card purchase can be split into
pub const MAX_INSTALLMENTS: u32 = 24;

/// How a transaction was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Debit,
    Pix,
    CreditCard,
}

impl PaymentKind {
    /// Parse payment kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "debito" | "débito" => Some(Self::Debit),
            "pix" => Some(Self::Pix),
            "credit_card" | "credit" | "card" | "credito" | "crédito" => Some(Self::CreditCard),
            _ => None,
        }
    }

    /// Debit and Pix settle against a bank account
    pub fn uses_account(&self) -> bool {
        matches!(self, Self::Debit | Self::Pix)
    }

    /// Largest installment count this payment kind allows
    pub fn max_installments(&self) -> u32 {
        match self {
            Self::Debit | Self::Pix => 1,
            Self::CreditCard => MAX_INSTALLMENTS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Pix => "pix",
            Self::CreditCard => "credit_card",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "Debit"),
            Self::Pix => write!(f, "Pix"),
            Self::CreditCard => write!(f, "Credit card"),
        }
    }
}

/// The single account or card a transaction is posted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTarget {
    Account(AccountId),
    CreditCard(CreditCardId),
}

impl PaymentTarget {
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Account(id) => Some(*id),
            Self::CreditCard(_) => None,
        }
    }

    pub fn credit_card_id(&self) -> Option<CreditCardId> {
        match self {
            Self::Account(_) => None,
            Self::CreditCard(id) => Some(*id),
        }
    }

    /// Whether this target is the kind the payment method settles against
    pub fn matches(&self, payment_kind: PaymentKind) -> bool {
        match self {
            Self::Account(_) => payment_kind.uses_account(),
            Self::CreditCard(_) => payment_kind == PaymentKind::CreditCard,
        }
    }
}

impl fmt::Display for PaymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => write!(f, "{}", id),
            Self::CreditCard(id) => write!(f, "{}", id),
        }
    }
}

/// A financial transaction (or one installment of a split purchase)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owner of this transaction
    pub owner_id: OwnerId,

    /// Income or expense category
    pub category_id: CategoryId,

    /// Account or card this transaction is posted to
    pub target: PaymentTarget,

    /// Free-text description
    pub description: String,

    /// Amount, always positive. For installments this is the per-installment share.
    pub amount: Money,

    /// Amount of the whole purchase; equals `amount` for single transactions
    pub purchase_total: Money,

    /// Transaction date (for installments, the month this installment falls in)
    pub date: NaiveDate,

    /// How it was paid
    pub payment_kind: PaymentKind,

    /// Total number of installments in the group (1 for a plain transaction)
    pub installments: u32,

    /// 1-based position within the group
    pub installment_number: u32,

    /// Set on installments 2..N, pointing at installment 1
    pub parent_id: Option<TransactionId>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a single (non-split) transaction
    pub fn new(
        owner_id: OwnerId,
        category_id: CategoryId,
        target: PaymentTarget,
        payment_kind: PaymentKind,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            owner_id,
            category_id,
            target,
            description: description.into(),
            amount,
            purchase_total: amount,
            date,
            payment_kind,
            installments: 1,
            installment_number: 1,
            parent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Installment 1 of a split purchase
    pub fn is_parent(&self) -> bool {
        self.installments > 1 && self.installment_number == 1
    }

    /// Installments 2..N of a split purchase
    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Part of a split purchase (parent or child)
    pub fn is_split(&self) -> bool {
        self.installments > 1
    }

    /// "i/N" for split purchases
    pub fn installment_label(&self) -> Option<String> {
        self.is_split()
            .then(|| format!("{}/{}", self.installment_number, self.installments))
    }

    /// Sum of the installment shares, short of `purchase_total` by the
    /// cents dropped when the purchase was split
    pub fn installments_total(&self) -> Money {
        self.amount.times(i64::from(self.installments))
    }

    /// Statement closing date this installment is billed on
    ///
    /// Only credit card transactions have one.
    pub fn due_date(&self, closing_day: u8) -> Option<NaiveDate> {
        match self.payment_kind {
            PaymentKind::CreditCard => Some(billing::due_date_for(self.date, closing_day)),
            PaymentKind::Debit | PaymentKind::Pix => None,
        }
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.target.account_id()
    }

    pub fn credit_card_id(&self) -> Option<CreditCardId> {
        self.target.credit_card_id()
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if !self.target.matches(self.payment_kind) {
            return Err(TransactionValidationError::TargetMismatch(self.payment_kind));
        }

        if self.installments == 0 {
            return Err(TransactionValidationError::NoInstallments);
        }

        if self.installments > self.payment_kind.max_installments() {
            return Err(TransactionValidationError::TooManyInstallments {
                payment_kind: self.payment_kind,
                installments: self.installments,
            });
        }

        if self.installment_number == 0 || self.installment_number > self.installments {
            return Err(TransactionValidationError::InstallmentOutOfRange {
                number: self.installment_number,
                installments: self.installments,
            });
        }

        if self.parent_id.is_some() != (self.installment_number > 1) {
            return Err(TransactionValidationError::ParentLink);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyDescription,
    NonPositiveAmount(Money),
    TargetMismatch(PaymentKind),
    NoInstallments,
    TooManyInstallments {
        payment_kind: PaymentKind,
        installments: u32,
    },
    InstallmentOutOfRange {
        number: u32,
        installments: u32,
    },
    ParentLink,
}

impl TransactionValidationError {
    /// Name of the field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyDescription => "description",
            Self::NonPositiveAmount(_) => "amount",
            Self::TargetMismatch(kind) if kind.uses_account() => "account_id",
            Self::TargetMismatch(_) => "credit_card_id",
            Self::NoInstallments | Self::TooManyInstallments { .. } => "installments",
            Self::InstallmentOutOfRange { .. } => "installment_number",
            Self::ParentLink => "parent_transaction_id",
        }
    }
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::TargetMismatch(kind) if kind.uses_account() => {
                write!(f, "{} payments must be posted to an account", kind)
            }
            Self::TargetMismatch(kind) => {
                write!(f, "{} payments must be posted to a credit card", kind)
            }
            Self::NoInstallments => write!(f, "Installment count must be at least 1"),
            Self::TooManyInstallments {
                payment_kind,
                installments,
            } => {
                if payment_kind.uses_account() {
                    write!(f, "{} payments cannot be split into installments", payment_kind)
                } else {
                    write!(
                        f,
                        "At most {} installments allowed (got {})",
                        MAX_INSTALLMENTS, installments
                    )
                }
            }
            Self::InstallmentOutOfRange {
                number,
                installments,
            } => write!(
                f,
                "Installment number {} outside 1..={}",
                number, installments
            ),
            Self::ParentLink => write!(
                f,
                "Only installments after the first may reference a parent transaction"
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

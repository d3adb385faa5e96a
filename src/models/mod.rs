//! Core data models for Parcela
//!
//! This module contains the data structures of the finance domain (accounts,
//! credit cards, categories, transactions) and the billing-cycle calendar.

pub mod account;
pub mod billing;
pub mod category;
pub mod credit_card;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use account::Account;
pub use category::{Category, CategoryKind};
pub use credit_card::CreditCard;
pub use ids::{AccountId, CategoryId, CreditCardId, OwnerId, TransactionId};
pub use money::Money;
pub use period::{parse_date, DateRange, MonthPeriod};
pub use transaction::{PaymentKind, PaymentTarget, Transaction, MAX_INSTALLMENTS};

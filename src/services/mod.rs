//! Service layer for Parcela
//!
//! Business rules on top of the storage layer: validation, the installment
//! scheduler, the balance ledger and the atomic create/delete of transactions.

pub mod account;
pub mod category;
pub mod credit_card;
pub mod installment;
pub mod ledger;
pub mod transaction;

pub use account::AccountService;
pub use category::CategoryService;
pub use credit_card::{CreditCardService, CreditCardSummary, CreditCardUpdate};
pub use installment::{schedule, Installment, InstallmentPlan, PurchaseSpec};
pub use ledger::BalanceEffect;
pub use transaction::{DeletedTransaction, Page, TransactionFilter, TransactionService};

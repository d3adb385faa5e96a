//! Parcela - personal finance ledger with installment purchases
//!
//! This library tracks bank accounts, credit cards, income/expense categories
//! and transactions, including credit-card purchases split into monthly
//! installments. Dashboards, balance projections and monthly reports are
//! derived from the stored transactions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models and the billing-cycle calendar
//! - `storage`: JSON file storage layer with atomic units of work
//! - `services`: Business logic (installment scheduler, balance ledger, CRUD)
//! - `reports`: Dashboard, projections, monthly chart and summaries
//! - `audit`: Audit logging system
//! - `clock`: Source of "today"
//! - `cli` and `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use parcela::config::{paths::ParcelaPaths, settings::Settings};
//! use parcela::storage::Storage;
//!
//! let paths = ParcelaPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ParcelaError, ParcelaResult};

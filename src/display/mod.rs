//! Display formatting for terminal output
//!
//! Tables and detail views for the data models, plus report helpers.

pub mod account;
pub mod category;
pub mod credit_card;
pub mod report;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use category::{format_category_details, format_category_tree};
pub use credit_card::{format_credit_card_details, format_credit_card_list};
pub use report::{format_bar, format_chart_bars, format_header};
pub use transaction::{
    format_installment_plan, format_transaction_details, format_transaction_register,
    format_transaction_row, NameLookup,
};

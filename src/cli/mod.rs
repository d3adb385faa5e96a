//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod category;
pub mod credit_card;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use credit_card::{handle_card_command, CardCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{parse_date, CategoryKind, DateRange, Money};

/// Parse a money argument, naming the field on failure
pub(crate) fn parse_money(field: &str, value: &str) -> ParcelaResult<Money> {
    Money::parse(value).map_err(|e| {
        ParcelaError::validation(
            field,
            format!("Invalid amount '{}': {}. Use a format like '1000.00' or '1000,00'", value, e),
        )
    })
}

pub(crate) fn parse_optional_date(field: &str, value: Option<&str>) -> ParcelaResult<Option<NaiveDate>> {
    value.map(|v| parse_date(field, v)).transpose()
}

pub(crate) fn parse_kind(value: &str) -> ParcelaResult<CategoryKind> {
    CategoryKind::parse(value).ok_or_else(|| {
        ParcelaError::validation(
            "type",
            format!("Invalid category type '{}'. Use 'income' or 'expense'", value),
        )
    })
}

/// Range from `--start`/`--end`; `None` when neither is given
pub(crate) fn parse_range(start: Option<&str>, end: Option<&str>) -> ParcelaResult<Option<DateRange>> {
    match (parse_optional_date("start_date", start)?, parse_optional_date("end_date", end)?) {
        (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
        (None, None) => Ok(None),
        _ => Err(ParcelaError::validation(
            "start_date",
            "Give both --start and --end, or neither",
        )),
    }
}

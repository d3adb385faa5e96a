//! Credit card model
//!
//! A card accumulates expense charges in its running balance. Its statement
//! closes on a fixed day of the month; see [`super::billing`] for how that day
//! maps purchases to billing cycles.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::billing::{self, CLOSING_DAYS};
use super::ids::{CreditCardId, OwnerId};
use super::money::Money;
use super::period::MonthPeriod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CreditCardId,
    pub owner_id: OwnerId,
    /// e.g. "Nubank"
    pub name: String,
    /// Day of month the statement closes, 1 to 31
    pub closing_day: u8,
    /// Sum of posted expense charges
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditCard {
    pub fn new(owner_id: OwnerId, name: impl Into<String>, closing_day: u8) -> Self {
        let now = Utc::now();
        Self {
            id: CreditCardId::new(),
            owner_id,
            name: name.into(),
            closing_day,
            balance: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn adjust_balance(&mut self, delta: Money) {
        self.balance += delta;
        self.updated_at = Utc::now();
    }

    /// Next statement closing date as of `today`
    pub fn next_closing_date(&self, today: NaiveDate) -> NaiveDate {
        billing::next_closing_date(today, self.closing_day)
    }

    /// Statement month a purchase on `date` is billed in
    pub fn billing_cycle_for(&self, date: NaiveDate) -> MonthPeriod {
        billing::billing_cycle_for(date, self.closing_day)
    }

    pub fn validate(&self) -> Result<(), CreditCardValidationError> {
        match self.name.trim().chars().count() {
            0 => return Err(CreditCardValidationError::EmptyName),
            n if n > 100 => return Err(CreditCardValidationError::NameTooLong(n)),
            _ => {}
        }
        if !CLOSING_DAYS.contains(&self.closing_day) {
            return Err(CreditCardValidationError::InvalidClosingDay(self.closing_day));
        }
        Ok(())
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (closes day {})", self.name, self.closing_day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreditCardValidationError {
    #[error("Card name cannot be empty")]
    EmptyName,
    #[error("Card name has {0} characters; the limit is 100")]
    NameTooLong(usize),
    #[error("Closing day must be between 1 and 31 (got {0})")]
    InvalidClosingDay(u8),
}

impl CreditCardValidationError {
    /// Name of the field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong(_) => "name",
            Self::InvalidClosingDay(_) => "closing_day",
        }
    }
}

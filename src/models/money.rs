//! Cent-precision currency amounts
//!
//! Amounts are whole cents in an `i64`. Installment shares come from
//! truncating division, so a split purchase can lose up to `N - 1` cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A currency amount in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// ```
    /// use parcela::models::Money;
    /// assert_eq!(Money::from_cents(1050).to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// One of `parts` equal installment shares, remainder dropped
    pub const fn split(&self, parts: u32) -> Self {
        match parts {
            0 => *self,
            n => Self(self.0 / n as i64),
        }
    }

    pub const fn times(&self, factor: i64) -> Self {
        Self(self.0 * factor)
    }

    /// Parse user input such as `10.50`, `10,50`, `R$ 10.50` or `-10`
    ///
    /// At most two fractional digits are accepted.
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(input.to_string());

        let trimmed = input.trim();
        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest.trim_start()),
            None => (1, trimmed),
        };
        let digits = ["R$", "$"]
            .iter()
            .find_map(|symbol| rest.strip_prefix(symbol))
            .unwrap_or(rest)
            .trim_start()
            .replace(',', ".");

        let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > 2
            || !all_digits(whole)
            || !all_digits(frac)
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let frac: i64 = format!("{:0<2}", frac).parse().map_err(|_| invalid())?;

        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac))
            .map(|cents| Self(sign * cents))
            .ok_or_else(invalid)
    }

    /// `R$ 1234.56`, or `-R$ 0.05` for negatives
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{} {}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        f.pad(&format!("{}{}.{:02}", sign, abs / 100, abs % 100))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "not an amount: {:?}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

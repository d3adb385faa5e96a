//! Period totals and the income/expense summary report
//!
//! Sums transaction amounts by category kind over a date range, optionally
//! broken down by category name or by calendar month.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{Category, CategoryId, CategoryKind, DateRange, Money, MonthPeriod, OwnerId, Transaction};
use crate::storage::Storage;

/// The owner's categories keyed by ID
pub(crate) fn categories_by_id(
    storage: &Storage,
    owner: OwnerId,
) -> ParcelaResult<HashMap<CategoryId, Category>> {
    Ok(storage
        .categories
        .list(owner, None)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect())
}

/// Income and expense totals for a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTotals {
    pub range: DateRange,
    pub income: Money,
    pub expenses: Money,
}

impl PeriodTotals {
    /// Sum the owner's transactions dated inside `range`
    pub fn compute(storage: &Storage, owner: OwnerId, range: DateRange) -> ParcelaResult<Self> {
        let categories = categories_by_id(storage, owner)?;
        let transactions = storage.transactions.in_range(owner, range)?;
        Ok(Self::from_transactions(range, &transactions, &categories))
    }

    pub(crate) fn from_transactions(
        range: DateRange,
        transactions: &[Transaction],
        categories: &HashMap<CategoryId, Category>,
    ) -> Self {
        let mut totals = Self {
            range,
            income: Money::zero(),
            expenses: Money::zero(),
        };

        for txn in transactions.iter().filter(|t| range.contains(t.date)) {
            match categories.get(&txn.category_id).map(|c| c.kind) {
                Some(CategoryKind::Income) => totals.income += txn.amount,
                Some(CategoryKind::Expense) => totals.expenses += txn.amount,
                None => {}
            }
        }

        totals
    }

    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

/// How the summary report breaks its totals down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    #[default]
    Category,
    Month,
}

impl GroupBy {
    pub fn parse(s: &str) -> ParcelaResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "month" => Ok(Self::Month),
            other => Err(ParcelaError::validation(
                "group_by",
                format!("Expected 'category' or 'month', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Month => write!(f, "month"),
        }
    }
}

/// Total for one category name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTotals {
    pub month: MonthPeriod,
    pub income: Money,
    pub expenses: Money,
}

impl MonthTotals {
    pub fn net(&self) -> Money {
        self.income - self.expenses
    }
}

/// Summary report over a caller-supplied range
#[derive(Debug, Clone)]
pub enum ReportSummary {
    ByCategory {
        range: DateRange,
        /// Sorted by category name
        income: Vec<CategoryTotal>,
        /// Sorted by category name
        expenses: Vec<CategoryTotal>,
    },
    ByMonth {
        range: DateRange,
        /// Ascending by month; months without transactions are omitted
        months: Vec<MonthTotals>,
    },
}

impl ReportSummary {
    pub fn generate(
        storage: &Storage,
        owner: OwnerId,
        range: DateRange,
        group_by: GroupBy,
    ) -> ParcelaResult<Self> {
        let categories = categories_by_id(storage, owner)?;
        let transactions = storage.transactions.in_range(owner, range)?;

        let classified = transactions
            .iter()
            .filter_map(|t| categories.get(&t.category_id).map(|c| (t, c)));

        match group_by {
            GroupBy::Category => {
                let mut income: BTreeMap<&str, Money> = BTreeMap::new();
                let mut expenses: BTreeMap<&str, Money> = BTreeMap::new();

                for (txn, category) in classified {
                    let bucket = match category.kind {
                        CategoryKind::Income => &mut income,
                        CategoryKind::Expense => &mut expenses,
                    };
                    *bucket.entry(category.name.as_str()).or_default() += txn.amount;
                }

                let collect = |totals: BTreeMap<&str, Money>| {
                    totals
                        .into_iter()
                        .map(|(name, total)| CategoryTotal {
                            category: name.to_string(),
                            total,
                        })
                        .collect()
                };

                Ok(Self::ByCategory {
                    range,
                    income: collect(income),
                    expenses: collect(expenses),
                })
            }
            GroupBy::Month => {
                let mut months: BTreeMap<MonthPeriod, MonthTotals> = BTreeMap::new();

                for (txn, category) in classified {
                    let month = MonthPeriod::of(txn.date);
                    let totals = months.entry(month).or_insert(MonthTotals {
                        month,
                        income: Money::zero(),
                        expenses: Money::zero(),
                    });
                    match category.kind {
                        CategoryKind::Income => totals.income += txn.amount,
                        CategoryKind::Expense => totals.expenses += txn.amount,
                    }
                }

                Ok(Self::ByMonth {
                    range,
                    months: months.into_values().collect(),
                })
            }
        }
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        match self {
            Self::ByCategory {
                range,
                income,
                expenses,
            } => {
                output.push_str(&format!("Summary by category ({})\n", range));
                for (title, rows) in [("Income", income), ("Expenses", expenses)] {
                    output.push_str(&format!("\n{}\n", title));
                    output.push_str(&format!("{}\n", "-".repeat(40)));
                    if rows.is_empty() {
                        output.push_str("  (none)\n");
                    }
                    for row in rows.iter() {
                        output.push_str(&format!(
                            "  {:<24} {:>13}\n",
                            row.category,
                            row.total.format_with_symbol(currency)
                        ));
                    }
                    let total: Money = rows.iter().map(|r| r.total).sum();
                    output.push_str(&format!(
                        "  {:<24} {:>13}\n",
                        "Total",
                        total.format_with_symbol(currency)
                    ));
                }
            }
            Self::ByMonth { range, months } => {
                output.push_str(&format!("Summary by month ({})\n\n", range));
                output.push_str(&format!(
                    "{:<8} {:>14} {:>14} {:>14}\n",
                    "Month", "Income", "Expenses", "Net"
                ));
                output.push_str(&format!("{}\n", "-".repeat(53)));
                for month in months {
                    output.push_str(&format!(
                        "{:<8} {:>14} {:>14} {:>14}\n",
                        month.month.to_string(),
                        month.income.format_with_symbol(currency),
                        month.expenses.format_with_symbol(currency),
                        month.net().format_with_symbol(currency)
                    ));
                }
                if months.is_empty() {
                    output.push_str("No transactions in this period.\n");
                }
            }
        }

        output
    }
}

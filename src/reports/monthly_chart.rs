//! Six-month income/expense chart
//!
//! Actual totals for the trailing six months, plus the installment charges
//! expected in the current month.

use crate::clock::Clock;
use crate::error::ParcelaResult;
use crate::models::{CategoryKind, DateRange, Money, MonthPeriod, OwnerId, Transaction};
use crate::storage::Storage;

use super::summary::{categories_by_id, PeriodTotals};

/// Months covered by the chart, the current one included
pub const CHART_MONTHS: i32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub period: MonthPeriod,
    /// Short label, e.g. "Fev/2024"
    pub label: String,
    pub income: Money,
    pub expenses: Money,
    /// Installment charges expected in the month; only for months not
    /// before the current one
    pub projected: Option<Money>,
}

#[derive(Debug, Clone)]
pub struct MonthlyChart {
    /// Oldest month first
    pub points: Vec<ChartPoint>,
}

impl MonthlyChart {
    pub fn generate(storage: &Storage, clock: &dyn Clock, owner: OwnerId) -> ParcelaResult<Self> {
        let current = MonthPeriod::of(clock.today());
        let categories = categories_by_id(storage, owner)?;
        let transactions = storage.transactions.list(owner)?;

        let split_expenses: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| {
                t.is_split()
                    && categories.get(&t.category_id).map(|c| c.kind) == Some(CategoryKind::Expense)
            })
            .collect();

        let points = (0..CHART_MONTHS)
            .rev()
            .map(|back| {
                let period = current.offset(-back);
                let totals =
                    PeriodTotals::from_transactions(DateRange::month(period), &transactions, &categories);
                let projected = (period >= current).then(|| projected_for(period, &split_expenses));
                ChartPoint {
                    period,
                    label: period.label(),
                    income: totals.income,
                    expenses: totals.expenses,
                    projected,
                }
            })
            .collect();

        Ok(Self { points })
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>14}\n",
            "Month", "Income", "Expenses", "Projected"
        ));
        output.push_str(&format!("{}\n", "-".repeat(55)));

        for point in &self.points {
            let projected = point
                .projected
                .map(|p| p.format_with_symbol(currency))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>14}\n",
                point.label,
                point.income.format_with_symbol(currency),
                point.expenses.format_with_symbol(currency),
                projected
            ));
        }

        output
    }
}

/// Sum of the shares whose `[date, date + installments months)` window
/// covers `period`
fn projected_for(period: MonthPeriod, split_expenses: &[&Transaction]) -> Money {
    split_expenses
        .iter()
        .filter(|t| {
            let elapsed = MonthPeriod::of(t.date).months_until(&period);
            elapsed >= 0 && (elapsed as u32) < t.installments
        })
        .map(|t| t.amount)
        .sum()
}

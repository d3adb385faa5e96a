//! Forward balance projection
//!
//! For each of the next `n` months, the card charges billed that month and
//! the account balance left once they are paid.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{CategoryKind, CreditCard, CreditCardId, Money, MonthPeriod, OwnerId, PaymentTarget};
use crate::storage::Storage;

use super::summary::categories_by_id;

/// Longest horizon a projection may cover
pub const MAX_PROJECTION_MONTHS: u32 = 120;

/// A card charge falling in a projected month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedInstallment {
    pub description: String,
    pub amount: Money,
    pub card_name: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct ProjectedMonth {
    pub period: MonthPeriod,
    /// Months ahead of the current one, starting at 1
    pub offset: u32,
    pub projected_balance: Money,
    pub card_expenses: Money,
    pub installments: Vec<ProjectedInstallment>,
}

#[derive(Debug, Clone)]
pub struct ProjectionReport {
    /// Total account balance the projection starts from
    pub starting_balance: Money,
    pub months: Vec<ProjectedMonth>,
}

impl ProjectionReport {
    pub fn generate(
        storage: &Storage,
        clock: &dyn Clock,
        owner: OwnerId,
        months: u32,
    ) -> ParcelaResult<Self> {
        if months == 0 || months > MAX_PROJECTION_MONTHS {
            return Err(ParcelaError::validation(
                "months",
                format!("Projection must cover 1 to {} months", MAX_PROJECTION_MONTHS),
            ));
        }

        let starting_balance: Money = storage.accounts.list(owner)?.iter().map(|a| a.balance).sum();
        let cards: HashMap<CreditCardId, CreditCard> = storage
            .credit_cards
            .list(owner)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let categories = categories_by_id(storage, owner)?;

        let mut card_charges: Vec<_> = storage
            .transactions
            .list(owner)?
            .into_iter()
            .filter(|t| {
                matches!(t.target, PaymentTarget::CreditCard(_))
                    && categories.get(&t.category_id).map(|c| c.kind) == Some(CategoryKind::Expense)
            })
            .collect();
        card_charges.sort_by_key(|t| (t.date, t.created_at, t.installment_number));

        let current = MonthPeriod::of(clock.today());
        let months = (1..=months)
            .map(|offset| {
                let period = current.offset(offset as i32);
                let installments: Vec<ProjectedInstallment> = card_charges
                    .iter()
                    .filter(|t| period.contains(t.date))
                    .map(|t| {
                        let card = t.target.credit_card_id().and_then(|id| cards.get(&id));
                        ProjectedInstallment {
                            description: t.description.clone(),
                            amount: t.amount,
                            card_name: card.map(|c| c.name.clone()).unwrap_or_default(),
                            due_date: card.and_then(|c| t.due_date(c.closing_day)),
                        }
                    })
                    .collect();
                let card_expenses: Money = installments.iter().map(|i| i.amount).sum();

                // Each month also carries the charges of every month before it
                ProjectedMonth {
                    period,
                    offset,
                    projected_balance: starting_balance - card_expenses.times(i64::from(offset)),
                    card_expenses,
                    installments,
                }
            })
            .collect();

        Ok(Self {
            starting_balance,
            months,
        })
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Starting balance: {}\n\n",
            self.starting_balance.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "{:<10} {:>14} {:>16}\n",
            "Month", "Card charges", "Projected"
        ));
        output.push_str(&format!("{}\n", "-".repeat(42)));

        for month in &self.months {
            output.push_str(&format!(
                "{:<10} {:>14} {:>16}\n",
                month.period.to_string(),
                month.card_expenses.format_with_symbol(currency),
                month.projected_balance.format_with_symbol(currency)
            ));
            for installment in &month.installments {
                let due = installment
                    .due_date
                    .map(|d| format!("due {}", d.format("%Y-%m-%d")))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "    {:<30} {:>12}  {:<12} {}\n",
                    installment.description,
                    installment.amount.format_with_symbol(currency),
                    installment.card_name,
                    due
                ));
            }
        }

        output
    }
}

//! Dashboard report
//!
//! Balances, card statements, the period's income/expense totals and the
//! most recent transactions.

use crate::clock::Clock;
use crate::error::ParcelaResult;
use crate::models::{Account, CategoryKind, DateRange, Money, MonthPeriod, OwnerId, Transaction};
use crate::services::{CreditCardService, CreditCardSummary};
use crate::storage::Storage;

use super::summary::{categories_by_id, PeriodTotals};

/// How many recent transactions the dashboard lists by default
pub const RECENT_TRANSACTIONS: usize = 10;

/// A recent transaction with the kind of its category
#[derive(Debug, Clone)]
pub struct RecentTransaction {
    pub transaction: Transaction,
    pub kind: Option<CategoryKind>,
    /// "i/N" for installments
    pub installment_info: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Sum of every account balance
    pub current_balance: Money,
    pub accounts: Vec<Account>,
    pub credit_cards: Vec<CreditCardSummary>,
    pub totals: PeriodTotals,
    /// Newest first
    pub recent: Vec<RecentTransaction>,
}

impl DashboardReport {
    /// Build the dashboard; without a range the current month is used
    pub fn generate(
        storage: &Storage,
        clock: &dyn Clock,
        owner: OwnerId,
        range: Option<DateRange>,
    ) -> ParcelaResult<Self> {
        Self::generate_with_limit(storage, clock, owner, range, RECENT_TRANSACTIONS)
    }

    pub fn generate_with_limit(
        storage: &Storage,
        clock: &dyn Clock,
        owner: OwnerId,
        range: Option<DateRange>,
        recent_limit: usize,
    ) -> ParcelaResult<Self> {
        let today = clock.today();
        let range = range.unwrap_or_else(|| DateRange::month(MonthPeriod::of(today)));

        let accounts = storage.accounts.list(owner)?;
        let current_balance: Money = accounts.iter().map(|a| a.balance).sum();
        let credit_cards = CreditCardService::new(storage).summaries(owner, today)?;

        let categories = categories_by_id(storage, owner)?;
        let transactions = storage.transactions.list(owner)?;
        let totals = PeriodTotals::from_transactions(range, &transactions, &categories);

        let recent = transactions
            .into_iter()
            .take(recent_limit)
            .map(|transaction| RecentTransaction {
                kind: categories.get(&transaction.category_id).map(|c| c.kind),
                installment_info: transaction.installment_label(),
                transaction,
            })
            .collect();

        Ok(Self {
            current_balance,
            accounts,
            credit_cards,
            totals,
            recent,
        })
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Current balance: {}\n",
            self.current_balance.format_with_symbol(currency)
        ));
        for account in &self.accounts {
            output.push_str(&format!(
                "  {:<24} {:>14}\n",
                account.name,
                account.balance.format_with_symbol(currency)
            ));
        }

        if !self.credit_cards.is_empty() {
            output.push_str("\nCredit cards\n");
            for summary in &self.credit_cards {
                output.push_str(&format!(
                    "  {:<24} {:>14}  closes {}\n",
                    summary.card.name,
                    summary.card.balance.format_with_symbol(currency),
                    summary.next_closing_date.format("%Y-%m-%d")
                ));
            }
        }

        output.push_str(&format!("\nPeriod {}\n", self.totals.range));
        output.push_str(&format!(
            "  Income:   {:>14}\n  Expenses: {:>14}\n  Net:      {:>14}\n",
            self.totals.income.format_with_symbol(currency),
            self.totals.expenses.format_with_symbol(currency),
            self.totals.net().format_with_symbol(currency)
        ));

        output.push_str("\nRecent transactions\n");
        if self.recent.is_empty() {
            output.push_str("  (none)\n");
        }
        for recent in &self.recent {
            let sign = match recent.kind {
                Some(CategoryKind::Income) => "+",
                Some(CategoryKind::Expense) => "-",
                None => " ",
            };
            output.push_str(&format!(
                "  {}  {:<30} {}{:>13}  {}\n",
                recent.transaction.date.format("%Y-%m-%d"),
                recent.transaction.description,
                sign,
                recent.transaction.amount.format_with_symbol(currency),
                recent.installment_info.as_deref().unwrap_or("")
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::paths::ParcelaPaths;
    use crate::models::{PaymentKind, PaymentTarget};
    use crate::services::{CategoryService, PurchaseSpec, TransactionService};
    use crate::storage::seed_owner;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dashboard_defaults_to_current_month() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(ParcelaPaths::with_base_dir(temp.path().to_path_buf())).unwrap();
        let owner = OwnerId::new();
        seed_owner(&storage, owner).unwrap();

        let account = storage.accounts.list(owner).unwrap().remove(0);
        let nubank = storage.credit_cards.find_by_name(owner, "Nubank").unwrap().unwrap();
        let categories = CategoryService::new(&storage);
        let salary = categories.resolve(owner, "Salário", None).unwrap();
        let food = categories.resolve(owner, "Alimentação", None).unwrap();

        let txns = TransactionService::new(&storage);
        txns.create(
            owner,
            PurchaseSpec {
                description: "Salário".into(),
                amount: Money::from_cents(400000),
                date: date(2024, 2, 5),
                category_id: salary.id,
                payment_kind: PaymentKind::Pix,
                installments: 1,
                target: PaymentTarget::Account(account.id),
            },
        )
        .unwrap();
        txns.create(
            owner,
            PurchaseSpec {
                description: "Restaurante".into(),
                amount: Money::from_cents(30000),
                date: date(2024, 1, 20),
                category_id: food.id,
                payment_kind: PaymentKind::CreditCard,
                installments: 3,
                target: PaymentTarget::CreditCard(nubank.id),
            },
        )
        .unwrap();

        let clock = FixedClock(date(2024, 2, 10));
        let report = DashboardReport::generate(&storage, &clock, owner, None).unwrap();

        assert_eq!(report.current_balance.cents(), 400000);
        assert_eq!(report.totals.range, DateRange::month(MonthPeriod::new(2024, 2).unwrap()));
        assert_eq!(report.totals.income.cents(), 400000);
        // Only installment 2/3 falls in February
        assert_eq!(report.totals.expenses.cents(), 10000);

        let nubank_summary = report
            .credit_cards
            .iter()
            .find(|c| c.card.name == "Nubank")
            .unwrap();
        assert_eq!(nubank_summary.next_closing_date, date(2024, 2, 15));
        assert_eq!(nubank_summary.card.balance.cents(), 30000);

        let infos: Vec<_> = report
            .recent
            .iter()
            .map(|r| r.installment_info.clone())
            .collect();
        assert_eq!(
            infos,
            vec![Some("3/3".into()), Some("2/3".into()), None, Some("1/3".into())]
        );

        let text = report.format_terminal("R$");
        assert!(text.contains("Current balance: R$ 4000.00"));
    }

    #[test]
    fn test_recent_limit_and_explicit_range() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(ParcelaPaths::with_base_dir(temp.path().to_path_buf())).unwrap();
        let owner = OwnerId::new();
        let account = Account::new(owner, "Conta");
        let target = PaymentTarget::Account(account.id);
        storage.accounts.upsert(account).unwrap();
        let misc = CategoryService::new(&storage)
            .create(owner, "Diversos", CategoryKind::Expense)
            .unwrap();

        for day in 1..=12 {
            TransactionService::new(&storage)
                .create(
                    owner,
                    PurchaseSpec {
                        description: format!("Compra {}", day),
                        amount: Money::from_cents(100),
                        date: date(2024, 5, day),
                        category_id: misc.id,
                        payment_kind: PaymentKind::Debit,
                        installments: 1,
                        target,
                    },
                )
                .unwrap();
        }

        let clock = FixedClock(date(2024, 6, 1));
        let report = DashboardReport::generate(&storage, &clock, owner, None).unwrap();
        assert_eq!(report.recent.len(), RECENT_TRANSACTIONS);
        assert_eq!(report.recent[0].transaction.description, "Compra 12");
        assert!(report.totals.expenses.is_zero());

        let may = DateRange::new(date(2024, 5, 1), date(2024, 5, 6)).unwrap();
        let report = DashboardReport::generate_with_limit(&storage, &clock, owner, Some(may), 3).unwrap();
        assert_eq!(report.recent.len(), 3);
        assert_eq!(report.totals.expenses.cents(), 600);
        assert_eq!(report.current_balance.cents(), -1200);
    }
}

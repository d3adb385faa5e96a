//! Transaction display formatting
//!
//! Register and detail views. Installment rows carry their "i/N" position.

use std::collections::HashMap;

use crate::error::ParcelaResult;
use crate::models::{
    AccountId, Category, CategoryId, CategoryKind, CreditCardId, OwnerId, PaymentTarget, Transaction,
};
use crate::services::{InstallmentPlan, Page};
use crate::storage::Storage;

/// Names of the categories, accounts and cards transactions refer to
#[derive(Debug, Default)]
pub struct NameLookup {
    categories: HashMap<CategoryId, Category>,
    accounts: HashMap<AccountId, String>,
    credit_cards: HashMap<CreditCardId, String>,
}

impl NameLookup {
    pub fn load(storage: &Storage, owner: OwnerId) -> ParcelaResult<Self> {
        Ok(Self {
            categories: storage
                .categories
                .list(owner, None)?
                .into_iter()
                .map(|c| (c.id, c))
                .collect(),
            accounts: storage
                .accounts
                .list(owner)?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect(),
            credit_cards: storage
                .credit_cards
                .list(owner)?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect(),
        })
    }

    fn category(&self, txn: &Transaction) -> Option<&Category> {
        self.categories.get(&txn.category_id)
    }

    fn target_name(&self, target: PaymentTarget) -> String {
        let name = match target {
            PaymentTarget::Account(id) => self.accounts.get(&id),
            PaymentTarget::CreditCard(id) => self.credit_cards.get(&id),
        };
        name.cloned().unwrap_or_else(|| target.to_string())
    }
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, names: &NameLookup, currency: &str) -> String {
    let category = names.category(txn);
    let sign = match category.map(|c| c.kind) {
        Some(CategoryKind::Income) => "+",
        Some(CategoryKind::Expense) => "-",
        None => " ",
    };

    format!(
        "{} {} {:14} {:14} {}{:>13} {:>5}",
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.description, 28),
        truncate(category.map(|c| c.name.as_str()).unwrap_or("?"), 14),
        truncate(&names.target_name(txn.target), 14),
        sign,
        txn.amount.format_with_symbol(currency),
        txn.installment_label().unwrap_or_default()
    )
}

/// Format a page of transactions as a register
pub fn format_transaction_register(page: &Page<Transaction>, names: &NameLookup, currency: &str) -> String {
    if page.items.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:28} {:14} {:14} {:>14} {:>5}\n",
        "Date", "Description", "Category", "Paid with", "Amount", "Inst"
    ));
    output.push_str(&"-".repeat(92));
    output.push('\n');

    for txn in &page.items {
        output.push_str(&format_transaction_row(txn, names, currency));
        output.push('\n');
    }

    output.push_str(&format!(
        "\nPage {} of {} ({} transactions)\n",
        page.page,
        page.pages.max(1),
        page.total
    ));

    output
}

/// Format transaction details, listing the rest of its installment group
pub fn format_transaction_details(
    txn: &Transaction,
    group: &[Transaction],
    names: &NameLookup,
    currency: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id.full()));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Description: {}\n", txn.description));
    output.push_str(&format!("Amount:      {}\n", txn.amount.format_with_symbol(currency)));

    match names.category(txn) {
        Some(category) => output.push_str(&format!("Category:    {} ({})\n", category.name, category.kind)),
        None => output.push_str("Category:    (unknown)\n"),
    }

    output.push_str(&format!("Payment:     {}\n", txn.payment_kind));
    output.push_str(&format!("Paid with:   {}\n", names.target_name(txn.target)));

    if let Some(label) = txn.installment_label() {
        output.push_str(&format!("Installment: {}\n", label));
        output.push_str(&format!(
            "Purchase:    {}\n",
            txn.purchase_total.format_with_symbol(currency)
        ));
    }

    if group.len() > 1 {
        output.push_str("\nInstallments:\n");
        for installment in group {
            let marker = if installment.id == txn.id { "*" } else { " " };
            output.push_str(&format!(
                "  {} {:>5}  {}  {}\n",
                marker,
                installment.installment_label().unwrap_or_default(),
                installment.date.format("%Y-%m-%d"),
                installment.amount.format_with_symbol(currency)
            ));
        }
    }

    output
}

/// Summary printed after a purchase is recorded
pub fn format_installment_plan(plan: &InstallmentPlan, currency: &str) -> String {
    let parent = &plan.parent.transaction;
    let mut output = String::new();

    output.push_str(&format!(
        "Recorded: {} ({})\n",
        parent.description,
        plan.purchase_total().format_with_symbol(currency)
    ));
    output.push_str(&format!("  ID: {}\n", plan.parent_id().full()));

    if plan.installment_count() > 1 {
        for installment in plan.installments() {
            let due = installment
                .due_date
                .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {:>5}  {}  {}{}\n",
                installment.transaction.installment_label().unwrap_or_default(),
                installment.transaction.date.format("%Y-%m-%d"),
                installment.transaction.amount.format_with_symbol(currency),
                due
            ));
        }
    }

    output
}

/// Pad or cut a string to exactly `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

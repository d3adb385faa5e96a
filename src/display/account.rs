//! Account tables and detail views

use std::fmt::Write as _;

use crate::models::{Account, Money};

const TIMESTAMP: &str = "%Y-%m-%d %H:%M UTC";

/// Name, balance and full ID per row, with a total footer
pub fn format_account_list(accounts: &[Account], currency: &str) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let width = accounts
        .iter()
        .map(|a| a.name.chars().count())
        .chain(std::iter::once("TOTAL".len()))
        .max()
        .unwrap_or_default();
    let rule = format!("{}  {}\n", "-".repeat(width), "-".repeat(14));

    let mut out = format!("{:<width$}  {:>14}  ID\n", "Name", "Balance");
    out.push_str(&rule);
    for account in accounts {
        let _ = writeln!(
            out,
            "{:<width$}  {:>14}  {}",
            account.name,
            account.balance.format_with_symbol(currency),
            account.id.full(),
        );
    }

    let total: Money = accounts.iter().map(|a| a.balance).sum();
    out.push_str(&rule);
    let _ = writeln!(out, "{:<width$}  {:>14}", "TOTAL", total.format_with_symbol(currency));
    out
}

pub fn format_account_details(account: &Account, currency: &str) -> String {
    format!(
        "Account: {name}\n  ID:       {id}\n  Balance:  {balance}\n\n  Created:  {created}\n  Modified: {modified}\n",
        name = account.name,
        id = account.id.full(),
        balance = account.balance.format_with_symbol(currency),
        created = account.created_at.format(TIMESTAMP),
        modified = account.updated_at.format(TIMESTAMP),
    )
}

//! Credit card display formatting

use crate::models::CreditCard;
use crate::services::CreditCardSummary;

/// Format cards with their balance and the closing date of the open statement
pub fn format_credit_card_list(summaries: &[CreditCardSummary], currency: &str) -> String {
    if summaries.is_empty() {
        return "No credit cards found.\n".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| s.card.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:>14}  {:<12}  {}\n",
        "Name",
        "Closing",
        "Balance",
        "Next close",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->7}  {:->14}  {:-<12}  {:-<36}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for summary in summaries {
        output.push_str(&format!(
            "{:<name_width$}  {:>7}  {:>14}  {:<12}  {}\n",
            summary.card.name,
            summary.card.closing_day,
            summary.card.balance.format_with_symbol(currency),
            summary.next_closing_date.format("%Y-%m-%d").to_string(),
            summary.card.id.full(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single card's details
pub fn format_credit_card_details(summary: &CreditCardSummary, currency: &str) -> String {
    let card: &CreditCard = &summary.card;
    let mut output = String::new();

    output.push_str(&format!("Credit card: {}\n", card.name));
    output.push_str(&format!("  ID:           {}\n", card.id.full()));
    output.push_str(&format!("  Closing day:  {}\n", card.closing_day));
    output.push_str(&format!(
        "  Next closing: {}\n",
        summary.next_closing_date.format("%Y-%m-%d")
    ));
    output.push_str(&format!(
        "  Balance:      {}\n",
        card.balance.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Modified:     {}\n",
        card.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, OwnerId};
    use chrono::NaiveDate;

    fn summary(name: &str, closing_day: u8, cents: i64) -> CreditCardSummary {
        let mut card = CreditCard::new(OwnerId::new(), name, closing_day);
        card.balance = Money::from_cents(cents);
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        CreditCardSummary {
            next_closing_date: card.next_closing_date(today),
            card,
        }
    }

    #[test]
    fn test_format_credit_card_list() {
        let output = format_credit_card_list(&[summary("Nubank", 31, 12000)], "R$");
        assert!(output.contains("Nubank"));
        assert!(output.contains("2024-02-29"));
        assert!(output.contains("R$ 120.00"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_credit_card_list(&[], "R$").contains("No credit cards found"));
    }

    #[test]
    fn test_format_details() {
        let output = format_credit_card_details(&summary("Itaú", 10, 0), "R$");
        assert!(output.contains("Closing day:  10"));
        assert!(output.contains("Next closing: 2024-02-10"));
    }
}

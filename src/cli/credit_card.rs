//! Credit card CLI commands

use clap::Subcommand;

use crate::clock::{Clock, SystemClock};
use crate::config::settings::Settings;
use crate::display::credit_card::{format_credit_card_details, format_credit_card_list};
use crate::error::ParcelaResult;
use crate::models::OwnerId;
use crate::services::{CreditCardService, CreditCardSummary, CreditCardUpdate};
use crate::storage::Storage;

use super::parse_money;

/// Credit card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Create a new credit card
    Create {
        /// Card name
        name: String,
        /// Day of month the statement closes (1-31)
        #[arg(short = 'd', long)]
        closing_day: u8,
        /// Opening balance
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// List cards with the closing date of the open statement
    List,
    /// Show card details
    Show {
        /// Card name or ID
        card: String,
    },
    /// Change a card's name, closing day or balance
    Edit {
        /// Card name or ID
        card: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New closing day
        #[arg(short = 'd', long)]
        closing_day: Option<u8>,
        /// New balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
    },
    /// Delete a card with no transactions
    Delete {
        /// Card name or ID
        card: String,
    },
}

/// Handle a credit card command
pub fn handle_card_command(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    cmd: CardCommands,
) -> ParcelaResult<()> {
    let service = CreditCardService::new(storage);
    let currency = settings.currency_symbol.as_str();
    let today = SystemClock.today();

    match cmd {
        CardCommands::Create {
            name,
            closing_day,
            balance,
        } => {
            let opening = parse_money("balance", &balance)?;
            let card = service.create(owner, &name, closing_day, opening)?;

            println!("Created credit card: {}", card.name);
            println!("  Closing day: {}", card.closing_day);
            println!(
                "  Next closing: {}",
                card.next_closing_date(today).format("%Y-%m-%d")
            );
            println!("  ID: {}", card.id.full());
        }

        CardCommands::List => {
            let summaries = service.summaries(owner, today)?;
            print!("{}", format_credit_card_list(&summaries, currency));
        }

        CardCommands::Show { card } => {
            let card = service.resolve(owner, &card)?;
            let summary = CreditCardSummary {
                next_closing_date: card.next_closing_date(today),
                card,
            };
            print!("{}", format_credit_card_details(&summary, currency));
        }

        CardCommands::Edit {
            card,
            name,
            closing_day,
            balance,
        } => {
            let found = service.resolve(owner, &card)?;

            if name.is_none() && closing_day.is_none() && balance.is_none() {
                println!("No changes specified. Use --name, --closing-day or --balance.");
                return Ok(());
            }

            let balance = balance
                .map(|b| parse_money("balance", &b))
                .transpose()?;
            let updated = service.update(
                owner,
                found.id,
                CreditCardUpdate {
                    name,
                    closing_day,
                    balance,
                },
            )?;
            println!("Updated credit card: {}", updated.name);
        }

        CardCommands::Delete { card } => {
            let found = service.resolve(owner, &card)?;
            let deleted = service.delete(owner, found.id)?;
            println!("Deleted credit card: {}", deleted.name);
        }
    }

    Ok(())
}

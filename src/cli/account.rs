//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::ParcelaResult;
use crate::models::OwnerId;
use crate::services::AccountService;
use crate::storage::Storage;

use super::parse_money;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Opening balance (e.g., "1000.00" or "1000,00")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Rename an account
    Rename {
        /// Account name or ID
        account: String,
        /// New name
        name: String,
    },
    /// Correct an account's balance by hand
    SetBalance {
        /// Account name or ID
        account: String,
        /// New balance
        #[arg(allow_hyphen_values = true)]
        balance: String,
    },
    /// Delete an account with no transactions
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    cmd: AccountCommands,
) -> ParcelaResult<()> {
    let service = AccountService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        AccountCommands::Create { name, balance } => {
            let opening = parse_money("balance", &balance)?;
            let account = service.create(owner, &name, opening)?;

            println!("Created account: {}", account.name);
            println!("  Balance: {}", account.balance.format_with_symbol(currency));
            println!("  ID: {}", account.id.full());
        }

        AccountCommands::List => {
            let accounts = service.list(owner)?;
            print!("{}", format_account_list(&accounts, currency));
        }

        AccountCommands::Show { account } => {
            let found = service.resolve(owner, &account)?;
            print!("{}", format_account_details(&found, currency));
        }

        AccountCommands::Rename { account, name } => {
            let found = service.resolve(owner, &account)?;
            let updated = service.rename(owner, found.id, &name)?;
            println!("Renamed account: {} -> {}", found.name, updated.name);
        }

        AccountCommands::SetBalance { account, balance } => {
            let found = service.resolve(owner, &account)?;
            let balance = parse_money("balance", &balance)?;
            let updated = service.set_balance(owner, found.id, balance)?;
            println!(
                "Balance of {}: {} -> {}",
                updated.name,
                found.balance.format_with_symbol(currency),
                updated.balance.format_with_symbol(currency)
            );
        }

        AccountCommands::Delete { account } => {
            let found = service.resolve(owner, &account)?;
            let deleted = service.delete(owner, found.id)?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}

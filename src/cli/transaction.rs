//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing and deleting transactions.

use clap::Subcommand;

use crate::clock::{Clock, SystemClock};
use crate::config::settings::Settings;
use crate::display::transaction::{
    format_installment_plan, format_transaction_details, format_transaction_register, NameLookup,
};
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{OwnerId, PaymentKind, PaymentTarget, TransactionId};
use crate::services::transaction::DEFAULT_PAGE_SIZE;
use crate::services::{
    AccountService, CategoryService, CreditCardService, PurchaseSpec, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

use super::{parse_kind, parse_money, parse_optional_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record income or an expense
    Add {
        /// Description
        description: String,
        /// Amount of the whole purchase (e.g., "300.00")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Account name or ID (debit and pix)
        #[arg(short, long, conflicts_with = "card")]
        account: Option<String>,
        /// Credit card name or ID
        #[arg(long)]
        card: Option<String>,
        /// Payment method (debit, pix, credit_card); inferred from --account/--card
        #[arg(short, long)]
        payment: Option<String>,
        /// Number of installments (credit card only)
        #[arg(short, long, default_value_t = 1)]
        installments: u32,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
        /// Only income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Transactions per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: usize,
    },
    /// Show a transaction and its installment group
    Show {
        /// Transaction ID
        id: String,
    },
    /// Delete a transaction; deleting installment 1 removes the whole purchase
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    owner: OwnerId,
    cmd: TransactionCommands,
) -> ParcelaResult<()> {
    let service = TransactionService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            description,
            amount,
            category,
            account,
            card,
            payment,
            installments,
            date,
        } => {
            let amount = parse_money("amount", &amount)?;
            let date = parse_optional_date("transaction_date", date.as_deref())?
                .unwrap_or_else(|| SystemClock.today());
            let category = CategoryService::new(storage).resolve(owner, &category, None)?;

            let target = match (account, card) {
                (Some(account), None) => {
                    PaymentTarget::Account(AccountService::new(storage).resolve(owner, &account)?.id)
                }
                (None, Some(card)) => {
                    PaymentTarget::CreditCard(CreditCardService::new(storage).resolve(owner, &card)?.id)
                }
                _ => {
                    return Err(ParcelaError::validation(
                        "account_id",
                        "Give either --account or --card",
                    ))
                }
            };

            let payment_kind = match payment {
                Some(p) => PaymentKind::parse(&p).ok_or_else(|| {
                    ParcelaError::validation(
                        "payment_type",
                        format!("Invalid payment method '{}'. Use debit, pix or credit_card", p),
                    )
                })?,
                None => match target {
                    PaymentTarget::Account(_) => PaymentKind::Debit,
                    PaymentTarget::CreditCard(_) => PaymentKind::CreditCard,
                },
            };

            let plan = service.create(
                owner,
                PurchaseSpec {
                    description,
                    amount,
                    date,
                    category_id: category.id,
                    payment_kind,
                    installments,
                    target,
                },
            )?;
            print!("{}", format_installment_plan(&plan, currency));
        }

        TransactionCommands::List {
            from,
            until,
            kind,
            page,
            limit,
        } => {
            let mut filter = TransactionFilter::new();
            if let Some(start) = parse_optional_date("start_date", from.as_deref())? {
                filter = filter.from(start);
            }
            if let Some(end) = parse_optional_date("end_date", until.as_deref())? {
                filter = filter.until(end);
            }
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }

            let page = service.list(owner, &filter, page, limit)?;
            let names = NameLookup::load(storage, owner)?;
            print!("{}", format_transaction_register(&page, &names, currency));
        }

        TransactionCommands::Show { id } => {
            let id = parse_transaction_id(&id)?;
            let txn = service.get(owner, id)?;
            let group = service.installment_group(owner, id)?;
            let names = NameLookup::load(storage, owner)?;
            print!("{}", format_transaction_details(&txn, &group, &names, currency));
        }

        TransactionCommands::Delete { id } => {
            let id = parse_transaction_id(&id)?;
            let deleted = service.delete(owner, id)?;

            println!("Deleted transaction: {}", deleted.transaction.description);
            if deleted.children_removed > 0 {
                println!("  Installments removed: {}", deleted.children_removed + 1);
            }
            if !deleted.reversed.is_zero() {
                println!(
                    "  Balance adjusted by: {}",
                    (-deleted.reversed).format_with_symbol(currency)
                );
            }
        }
    }

    Ok(())
}

fn parse_transaction_id(value: &str) -> ParcelaResult<TransactionId> {
    value.parse().map_err(|_| {
        ParcelaError::validation(
            "transaction_id",
            format!("'{}' is not a transaction ID; use the full ID shown by 'txn add'", value),
        )
    })
}

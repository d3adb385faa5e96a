use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use parcela::cli::{
    handle_account_command, handle_card_command, handle_category_command, handle_report_command,
    handle_transaction_command,
};
use parcela::config::{paths::ParcelaPaths, settings::Settings};
use parcela::models::OwnerId;
use parcela::storage::{initialize_storage, seed_owner, Storage};

#[derive(Parser)]
#[command(
    name = "parcela",
    version,
    about = "Personal finance ledger with credit-card installments",
    long_about = "Parcela tracks bank accounts, credit cards and categorized \
                  transactions. Credit-card purchases can be split into monthly \
                  installments that follow each card's billing cycle."
)]
struct Cli {
    /// Owner whose data to use (defaults to the owner created by `init`)
    #[arg(long, global = true, env = "PARCELA_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and seed the default owner
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Bank account management commands
    #[command(subcommand)]
    Account(parcela::cli::AccountCommands),

    /// Credit card management commands
    #[command(subcommand)]
    Card(parcela::cli::CardCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(parcela::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(parcela::cli::TransactionCommands),

    /// Dashboard, projections, summaries and charts
    #[command(subcommand)]
    Report(parcela::cli::ReportCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ParcelaPaths::new()?;
    let explicit_owner = cli
        .owner
        .as_deref()
        .map(|o| o.parse::<OwnerId>().with_context(|| format!("Invalid owner ID '{}'", o)))
        .transpose()?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Parcela - personal finance with installments");
            println!();
            println!("Run 'parcela init' to get started.");
            println!("Run 'parcela --help' for usage information.");
            return Ok(());
        }
    };

    if let Commands::Init = command {
        println!("Initializing Parcela at: {}", paths.base_dir().display());
        let settings = initialize_storage(&paths)?;

        if let Some(owner) = explicit_owner {
            let storage = Storage::open(paths.clone())?;
            seed_owner(&storage, owner)?;
        }

        let owner = explicit_owner.or(settings.default_owner);
        println!("Initialization complete!");
        if let Some(owner) = owner {
            println!("  Owner: {}", owner.full());
        }
        println!();
        println!("Default categories, the account 'Conta Corrente' and the cards");
        println!("'Nubank' (closes on the 15th) and 'Itaú' (closes on the 10th) are ready.");
        println!("Run 'parcela report dashboard' to see them.");
        return Ok(());
    }

    let settings = Settings::load_or_create(&paths)?;

    if let Commands::Config = command {
        println!("Parcela Configuration");
        println!("=====================");
        println!("Config directory: {}", paths.base_dir().display());
        println!("Data directory:   {}", paths.data_dir().display());
        println!("Audit log:        {}", paths.audit_log().display());
        println!();
        println!("Settings:");
        println!("  Currency symbol:     {}", settings.currency_symbol);
        println!("  Date format:         {}", settings.date_format);
        println!("  Projection months:   {}", settings.projection_months);
        println!("  Recent transactions: {}", settings.recent_transactions);
        match settings.default_owner {
            Some(owner) => println!("  Default owner:       {}", owner.full()),
            None => println!("  Default owner:       (none, run 'parcela init')"),
        }
        return Ok(());
    }

    let owner = match explicit_owner.or(settings.default_owner) {
        Some(owner) => owner,
        None => bail!("No owner configured. Run 'parcela init' or pass --owner."),
    };

    let storage = Storage::open(paths)?;

    match command {
        Commands::Audit { limit } => {
            let entries = storage.audit_log().read_recent(owner, limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Commands::Account(cmd) => handle_account_command(&storage, &settings, owner, cmd)?,
        Commands::Card(cmd) => handle_card_command(&storage, &settings, owner, cmd)?,
        Commands::Category(cmd) => handle_category_command(&storage, owner, cmd)?,
        Commands::Txn(cmd) => handle_transaction_command(&storage, &settings, owner, cmd)?,
        Commands::Report(cmd) => handle_report_command(&storage, &settings, owner, cmd)?,
        Commands::Init | Commands::Config => {}
    }

    for warning in storage.take_audit_warnings() {
        eprintln!("Warning: change saved but not audited: {}", warning);
    }

    Ok(())
}

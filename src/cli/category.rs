//! Category CLI commands
//!
//! Implements CLI commands for income and expense categories.

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_tree};
use crate::error::ParcelaResult;
use crate::models::OwnerId;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::parse_kind;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Category type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: String,
    },
    /// List categories
    List {
        /// Only list one type (income or expense)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },
    /// Rename a category (default categories are read-only)
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },
    /// Delete an unused category (default categories are read-only)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    owner: OwnerId,
    cmd: CategoryCommands,
) -> ParcelaResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Create { name, kind } => {
            let kind = parse_kind(&kind)?;
            let category = service.create(owner, &name, kind)?;

            println!("Created category: {}", category.name);
            println!("  Type: {}", category.kind);
            println!("  ID: {}", category.id.full());
        }

        CategoryCommands::List { kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let categories = service.list(owner, kind)?;
            print!("{}", format_category_tree(&categories));
        }

        CategoryCommands::Show { category } => {
            let found = service.resolve(owner, &category, None)?;
            print!("{}", format_category_details(&found));
        }

        CategoryCommands::Rename { category, name } => {
            let found = service.resolve(owner, &category, None)?;
            let updated = service.rename(owner, found.id, &name)?;
            println!("Renamed category: {} -> {}", found.name, updated.name);
        }

        CategoryCommands::Delete { category } => {
            let found = service.resolve(owner, &category, None)?;
            let deleted = service.delete(owner, found.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}

//! Storage initialization
//!
//! First-run setup: directories, settings with a default owner, and the
//! starter data every new owner receives.

use crate::audit::EntityType;
use crate::config::paths::ParcelaPaths;
use crate::config::settings::Settings;
use crate::error::ParcelaResult;
use crate::models::category::{DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_CATEGORIES};
use crate::models::{Account, Category, CategoryKind, CreditCard, OwnerId};

use super::Storage;

/// Starter cards: name and closing day
const DEFAULT_CREDIT_CARDS: &[(&str, u8)] = &[("Nubank", 15), ("Itaú", 10)];

const DEFAULT_ACCOUNT: &str = "Conta Corrente";

/// Initialize storage for a fresh installation
///
/// Creates the data directories, picks a default owner if the settings have
/// none and seeds that owner. Running it again changes nothing.
pub fn initialize_storage(paths: &ParcelaPaths) -> ParcelaResult<Settings> {
    paths.ensure_directories()?;

    let mut settings = Settings::load_or_create(paths)?;
    let owner = match settings.default_owner {
        Some(owner) => owner,
        None => {
            let owner = OwnerId::new();
            settings.default_owner = Some(owner);
            owner
        }
    };

    let storage = Storage::open(paths.clone())?;
    seed_owner(&storage, owner)?;
    settings.save(paths)?;

    Ok(settings)
}

/// Give a new owner the default categories, a checking account and two cards
///
/// Returns `false` without touching anything when the owner already has data.
pub fn seed_owner(storage: &Storage, owner: OwnerId) -> ParcelaResult<bool> {
    if storage.categories.has_any(owner)? {
        return Ok(false);
    }

    storage.atomically(|s| {
        let defaults = DEFAULT_INCOME_CATEGORIES
            .iter()
            .map(|name| (*name, CategoryKind::Income))
            .chain(
                DEFAULT_EXPENSE_CATEGORIES
                    .iter()
                    .map(|name| (*name, CategoryKind::Expense)),
            );

        for (name, kind) in defaults {
            let category = Category::default_for(owner, name, kind);
            s.categories.upsert(category.clone())?;
            s.log_create(
                EntityType::Category,
                category.id.full(),
                owner,
                Some(category.name.clone()),
                &category,
            )?;
        }

        let account = Account::new(owner, DEFAULT_ACCOUNT);
        s.accounts.upsert(account.clone())?;
        s.log_create(
            EntityType::Account,
            account.id.full(),
            owner,
            Some(account.name.clone()),
            &account,
        )?;

        for (name, closing_day) in DEFAULT_CREDIT_CARDS {
            let card = CreditCard::new(owner, *name, *closing_day);
            s.credit_cards.upsert(card.clone())?;
            s.log_create(
                EntityType::CreditCard,
                card.id.full(),
                owner,
                Some(card.name.clone()),
                &card,
            )?;
        }

        Ok(true)
    })
}

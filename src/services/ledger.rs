//! Balance ledger
//!
//! Moves the running balance of the single account or card a transaction is
//! posted to. Accounts gain income and lose expenses; cards accumulate
//! expense charges and ignore income.

use crate::audit::EntityType;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{AccountId, CategoryKind, CreditCardId, Money, OwnerId, PaymentTarget};
use crate::storage::Storage;

/// The balance change one purchase causes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    Account { id: AccountId, delta: Money },
    CreditCard { id: CreditCardId, delta: Money },
    /// Income posted to a card moves nothing
    Unchanged,
}

impl BalanceEffect {
    /// Effect of posting `amount` under a category of `kind` to `target`
    pub fn for_transaction(kind: CategoryKind, target: PaymentTarget, amount: Money) -> Self {
        match (target, kind) {
            (PaymentTarget::Account(id), CategoryKind::Income) => Self::Account { id, delta: amount },
            (PaymentTarget::Account(id), CategoryKind::Expense) => Self::Account { id, delta: -amount },
            (PaymentTarget::CreditCard(id), CategoryKind::Expense) => {
                Self::CreditCard { id, delta: amount }
            }
            (PaymentTarget::CreditCard(_), CategoryKind::Income) => Self::Unchanged,
        }
    }

    pub fn delta(&self) -> Money {
        match self {
            Self::Account { delta, .. } | Self::CreditCard { delta, .. } => *delta,
            Self::Unchanged => Money::zero(),
        }
    }

    /// The effect that undoes this one
    pub fn inverse(&self) -> Self {
        match *self {
            Self::Account { id, delta } => Self::Account { id, delta: -delta },
            Self::CreditCard { id, delta } => Self::CreditCard { id, delta: -delta },
            Self::Unchanged => Self::Unchanged,
        }
    }

    /// Post the effect to the owner's account or card
    pub fn apply(&self, storage: &Storage, owner: OwnerId) -> ParcelaResult<()> {
        match *self {
            Self::Account { id, delta } => {
                let mut account = storage
                    .accounts
                    .get(owner, id)?
                    .ok_or_else(|| ParcelaError::account_not_found(id.to_string()))?;
                let before = account.clone();

                account.adjust_balance(delta);
                storage.accounts.upsert(account.clone())?;
                storage.log_update(
                    EntityType::Account,
                    account.id.full(),
                    owner,
                    Some(account.name.clone()),
                    &before,
                    &account,
                    Some(format!("balance: {} -> {}", before.balance, account.balance)),
                )
            }
            Self::CreditCard { id, delta } => {
                let mut card = storage
                    .credit_cards
                    .get(owner, id)?
                    .ok_or_else(|| ParcelaError::credit_card_not_found(id.to_string()))?;
                let before = card.clone();

                card.adjust_balance(delta);
                storage.credit_cards.upsert(card.clone())?;
                storage.log_update(
                    EntityType::CreditCard,
                    card.id.full(),
                    owner,
                    Some(card.name.clone()),
                    &before,
                    &card,
                    Some(format!("balance: {} -> {}", before.balance, card.balance)),
                )
            }
            Self::Unchanged => Ok(()),
        }
    }

    /// Undo a previously applied effect
    pub fn reverse(&self, storage: &Storage, owner: OwnerId) -> ParcelaResult<()> {
        self.inverse().apply(storage, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ParcelaPaths;
    use crate::models::{Account, CreditCard};
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParcelaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_effect_signs() {
        let account = PaymentTarget::Account(AccountId::new());
        let card = PaymentTarget::CreditCard(CreditCardId::new());
        let amount = Money::from_cents(3000);

        assert_eq!(
            BalanceEffect::for_transaction(CategoryKind::Income, account, amount).delta(),
            amount
        );
        assert_eq!(
            BalanceEffect::for_transaction(CategoryKind::Expense, account, amount).delta(),
            -amount
        );
        assert_eq!(
            BalanceEffect::for_transaction(CategoryKind::Expense, card, amount).delta(),
            amount
        );
        assert_eq!(
            BalanceEffect::for_transaction(CategoryKind::Income, card, amount),
            BalanceEffect::Unchanged
        );
    }

    #[test]
    fn test_apply_and_reverse_account() {
        let (_temp, storage) = create_storage();
        let owner = OwnerId::new();
        let account = Account::with_balance(owner, "Conta", Money::from_cents(10000));
        let id = account.id;
        storage.accounts.upsert(account).unwrap();

        let effect = BalanceEffect::for_transaction(
            CategoryKind::Expense,
            PaymentTarget::Account(id),
            Money::from_cents(3000),
        );

        effect.apply(&storage, owner).unwrap();
        assert_eq!(storage.accounts.get(owner, id).unwrap().unwrap().balance.cents(), 7000);

        effect.reverse(&storage, owner).unwrap();
        assert_eq!(storage.accounts.get(owner, id).unwrap().unwrap().balance.cents(), 10000);
    }

    #[test]
    fn test_apply_to_card() {
        let (_temp, storage) = create_storage();
        let owner = OwnerId::new();
        let card = CreditCard::new(owner, "Nubank", 15);
        let id = card.id;
        storage.credit_cards.upsert(card).unwrap();

        BalanceEffect::for_transaction(
            CategoryKind::Expense,
            PaymentTarget::CreditCard(id),
            Money::from_cents(6000),
        )
        .apply(&storage, owner)
        .unwrap();

        assert_eq!(storage.credit_cards.get(owner, id).unwrap().unwrap().balance.cents(), 6000);
    }

    #[test]
    fn test_foreign_target_not_found() {
        let (_temp, storage) = create_storage();
        let account = Account::new(OwnerId::new(), "Alheia");
        let id = account.id;
        storage.accounts.upsert(account).unwrap();

        let err = BalanceEffect::Account {
            id,
            delta: Money::from_cents(100),
        }
        .apply(&storage, OwnerId::new())
        .unwrap_err();
        assert!(err.is_not_found());
    }
}

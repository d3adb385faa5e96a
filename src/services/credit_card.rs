//! Credit card service

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{CreditCard, CreditCardId, Money, OwnerId, PaymentTarget};
use crate::storage::Storage;

/// Service for credit card management
pub struct CreditCardService<'a> {
    storage: &'a Storage,
}

/// Fields to change on a card; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct CreditCardUpdate {
    pub name: Option<String>,
    pub closing_day: Option<u8>,
    pub balance: Option<Money>,
}

/// A card with its next statement closing date
#[derive(Debug, Clone)]
pub struct CreditCardSummary {
    pub card: CreditCard,
    pub next_closing_date: NaiveDate,
}

fn validate(card: &CreditCard) -> ParcelaResult<()> {
    card.validate()
        .map_err(|e| ParcelaError::validation(e.field(), e.to_string()))
}

impl<'a> CreditCardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new card
    pub fn create(
        &self,
        owner: OwnerId,
        name: &str,
        closing_day: u8,
        opening_balance: Money,
    ) -> ParcelaResult<CreditCard> {
        let mut card = CreditCard::new(owner, name.trim(), closing_day);
        card.balance = opening_balance;
        validate(&card)?;

        self.storage.atomically(|storage| {
            storage.credit_cards.upsert(card.clone())?;
            storage.log_create(
                EntityType::CreditCard,
                card.id.full(),
                owner,
                Some(card.name.clone()),
                &card,
            )
        })?;

        Ok(card)
    }

    pub fn get(&self, owner: OwnerId, id: CreditCardId) -> ParcelaResult<CreditCard> {
        self.storage
            .credit_cards
            .get(owner, id)?
            .ok_or_else(|| ParcelaError::credit_card_not_found(id.to_string()))
    }

    /// Find a card by name or ID string
    pub fn find(&self, owner: OwnerId, identifier: &str) -> ParcelaResult<Option<CreditCard>> {
        if let Some(card) = self.storage.credit_cards.find_by_name(owner, identifier)? {
            return Ok(Some(card));
        }

        match identifier.parse::<CreditCardId>() {
            Ok(id) => self.storage.credit_cards.get(owner, id),
            Err(_) => Ok(None),
        }
    }

    pub fn resolve(&self, owner: OwnerId, identifier: &str) -> ParcelaResult<CreditCard> {
        self.find(owner, identifier)?
            .ok_or_else(|| ParcelaError::credit_card_not_found(identifier))
    }

    pub fn list(&self, owner: OwnerId) -> ParcelaResult<Vec<CreditCard>> {
        self.storage.credit_cards.list(owner)
    }

    /// Every card with the closing date of its current statement
    pub fn summaries(&self, owner: OwnerId, today: NaiveDate) -> ParcelaResult<Vec<CreditCardSummary>> {
        Ok(self
            .list(owner)?
            .into_iter()
            .map(|card| CreditCardSummary {
                next_closing_date: card.next_closing_date(today),
                card,
            })
            .collect())
    }

    /// Change name, closing day or balance
    pub fn update(
        &self,
        owner: OwnerId,
        id: CreditCardId,
        update: CreditCardUpdate,
    ) -> ParcelaResult<CreditCard> {
        let before = self.get(owner, id)?;
        let mut card = before.clone();
        let mut changes = Vec::new();

        if let Some(name) = update.name {
            card.name = name.trim().to_string();
            if card.name != before.name {
                changes.push(format!("name: {:?} -> {:?}", before.name, card.name));
            }
        }
        if let Some(day) = update.closing_day {
            card.closing_day = day;
            if day != before.closing_day {
                changes.push(format!("closing_day: {} -> {}", before.closing_day, day));
            }
        }
        if let Some(balance) = update.balance {
            card.balance = balance;
            if balance != before.balance {
                changes.push(format!("balance: {} -> {}", before.balance, balance));
            }
        }

        validate(&card)?;
        if changes.is_empty() {
            return Ok(before);
        }
        card.updated_at = Utc::now();

        self.storage.atomically(|storage| {
            storage.credit_cards.upsert(card.clone())?;
            storage.log_update(
                EntityType::CreditCard,
                card.id.full(),
                owner,
                Some(card.name.clone()),
                &before,
                &card,
                Some(changes.join(", ")),
            )
        })?;

        Ok(card)
    }

    /// Delete a card nothing is posted to
    pub fn delete(&self, owner: OwnerId, id: CreditCardId) -> ParcelaResult<CreditCard> {
        let card = self.get(owner, id)?;

        if self
            .storage
            .transactions
            .references_target(PaymentTarget::CreditCard(id))?
        {
            return Err(ParcelaError::Conflict(format!(
                "Credit card '{}' has transactions and cannot be deleted",
                card.name
            )));
        }

        self.storage.atomically(|storage| {
            storage.credit_cards.delete(id)?;
            storage.log_delete(
                EntityType::CreditCard,
                id.full(),
                owner,
                Some(card.name.clone()),
                &card,
            )
        })?;

        Ok(card)
    }
}

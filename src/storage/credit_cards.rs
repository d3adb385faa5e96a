//! Credit card repository for JSON storage
//!
//! Manages loading and saving cards to credit_cards.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ParcelaError;
use crate::models::{CreditCard, CreditCardId, OwnerId};

use super::file_io::{read_json, stage_json, StagedFile};
use super::{read_guard, write_guard};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CreditCardData {
    credit_cards: Vec<CreditCard>,
}

/// Repository for credit card persistence
pub struct CreditCardRepository {
    path: PathBuf,
    data: RwLock<HashMap<CreditCardId, CreditCard>>,
}

impl CreditCardRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load cards from disk
    pub fn load(&self) -> Result<(), ParcelaError> {
        let file_data: CreditCardData = read_json(&self.path)?;
        let mut data = write_guard(&self.data)?;

        data.clear();
        for card in file_data.credit_cards {
            data.insert(card.id, card);
        }

        Ok(())
    }

    pub fn stage(&self) -> Result<StagedFile, ParcelaError> {
        let data = read_guard(&self.data)?;

        let mut credit_cards: Vec<_> = data.values().cloned().collect();
        credit_cards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        stage_json(&self.path, &CreditCardData { credit_cards })
    }

    pub fn snapshot(&self) -> Result<HashMap<CreditCardId, CreditCard>, ParcelaError> {
        Ok(read_guard(&self.data)?.clone())
    }

    pub fn restore(&self, snapshot: HashMap<CreditCardId, CreditCard>) -> Result<(), ParcelaError> {
        *write_guard(&self.data)? = snapshot;
        Ok(())
    }

    /// Get a card by ID, provided it belongs to `owner`
    pub fn get(&self, owner: OwnerId, id: CreditCardId) -> Result<Option<CreditCard>, ParcelaError> {
        let data = read_guard(&self.data)?;
        Ok(data.get(&id).filter(|c| c.owner_id == owner).cloned())
    }

    /// All cards of an owner, sorted by name
    pub fn list(&self, owner: OwnerId) -> Result<Vec<CreditCard>, ParcelaError> {
        let data = read_guard(&self.data)?;

        let mut cards: Vec<_> = data
            .values()
            .filter(|c| c.owner_id == owner)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(cards)
    }

    /// Find a card by name (case-insensitive)
    pub fn find_by_name(&self, owner: OwnerId, name: &str) -> Result<Option<CreditCard>, ParcelaError> {
        let data = read_guard(&self.data)?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|c| c.owner_id == owner && c.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, card: CreditCard) -> Result<(), ParcelaError> {
        write_guard(&self.data)?.insert(card.id, card);
        Ok(())
    }

    pub fn delete(&self, id: CreditCardId) -> Result<bool, ParcelaError> {
        Ok(write_guard(&self.data)?.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::commit_staged;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CreditCardRepository::new(temp_dir.path().join("credit_cards.json"));
        let owner = OwnerId::new();
        let card = CreditCard::new(owner, "Itaú", 10);
        let id = card.id;

        repo.upsert(card).unwrap();
        commit_staged(vec![repo.stage().unwrap()]).unwrap();

        let reloaded = CreditCardRepository::new(temp_dir.path().join("credit_cards.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(owner, id).unwrap().unwrap().closing_day, 10);
    }

    #[test]
    fn test_owner_scoping() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CreditCardRepository::new(temp_dir.path().join("credit_cards.json"));
        let owner = OwnerId::new();
        let other = OwnerId::new();

        repo.upsert(CreditCard::new(owner, "Nubank", 15)).unwrap();
        repo.upsert(CreditCard::new(other, "Inter", 5)).unwrap();

        let cards = repo.list(owner).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Nubank");
        assert!(repo.find_by_name(owner, "NUBANK").unwrap().is_some());
        assert!(repo.find_by_name(owner, "Inter").unwrap().is_none());
    }
}

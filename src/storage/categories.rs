//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ParcelaError;
use crate::models::{Category, CategoryId, CategoryKind, OwnerId};

use super::file_io::{read_json, stage_json, StagedFile};
use super::{read_guard, write_guard};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), ParcelaError> {
        let file_data: CategoryData = read_json(&self.path)?;
        let mut categories = write_guard(&self.categories)?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    pub fn stage(&self) -> Result<StagedFile, ParcelaError> {
        let categories = read_guard(&self.categories)?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        stage_json(&self.path, &CategoryData { categories: list })
    }

    pub fn snapshot(&self) -> Result<HashMap<CategoryId, Category>, ParcelaError> {
        Ok(read_guard(&self.categories)?.clone())
    }

    pub fn restore(&self, snapshot: HashMap<CategoryId, Category>) -> Result<(), ParcelaError> {
        *write_guard(&self.categories)? = snapshot;
        Ok(())
    }

    /// Get a category by ID, provided it belongs to `owner`
    pub fn get(&self, owner: OwnerId, id: CategoryId) -> Result<Option<Category>, ParcelaError> {
        let categories = read_guard(&self.categories)?;
        Ok(categories.get(&id).filter(|c| c.owner_id == owner).cloned())
    }

    /// Categories of an owner, optionally of one kind, sorted by kind then name
    pub fn list(&self, owner: OwnerId, kind: Option<CategoryKind>) -> Result<Vec<Category>, ParcelaError> {
        let categories = read_guard(&self.categories)?;

        let mut list: Vec<_> = categories
            .values()
            .filter(|c| c.owner_id == owner && kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            a.kind
                .as_str()
                .cmp(b.kind.as_str())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(list)
    }

    /// Find a category by name within one kind (case-insensitive)
    pub fn find_by_name(
        &self,
        owner: OwnerId,
        kind: CategoryKind,
        name: &str,
    ) -> Result<Option<Category>, ParcelaError> {
        let categories = read_guard(&self.categories)?;

        let name_lower = name.trim().to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.owner_id == owner && c.kind == kind && c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Whether an owner already has any categories
    pub fn has_any(&self, owner: OwnerId) -> Result<bool, ParcelaError> {
        Ok(read_guard(&self.categories)?
            .values()
            .any(|c| c.owner_id == owner))
    }

    pub fn upsert(&self, category: Category) -> Result<(), ParcelaError> {
        write_guard(&self.categories)?.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, ParcelaError> {
        Ok(write_guard(&self.categories)?.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        repo.upsert(Category::new(owner, "Salário", CategoryKind::Income)).unwrap();
        repo.upsert(Category::new(owner, "Mercado", CategoryKind::Expense)).unwrap();
        repo.upsert(Category::new(owner, "Aluguel", CategoryKind::Expense)).unwrap();
        repo.upsert(Category::new(OwnerId::new(), "Outro", CategoryKind::Expense)).unwrap();

        let all: Vec<_> = repo.list(owner, None).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(all, vec!["Aluguel", "Mercado", "Salário"]);

        let income = repo.list(owner, Some(CategoryKind::Income)).unwrap();
        assert_eq!(income.len(), 1);
    }

    #[test]
    fn test_find_by_name_respects_kind() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        repo.upsert(Category::new(owner, "Outros", CategoryKind::Income)).unwrap();

        assert!(repo
            .find_by_name(owner, CategoryKind::Income, "outros")
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_name(owner, CategoryKind::Expense, "Outros")
            .unwrap()
            .is_none());
        assert!(repo.has_any(owner).unwrap());
        assert!(!repo.has_any(OwnerId::new()).unwrap());
    }
}

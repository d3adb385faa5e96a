//! Category service
//!
//! Category names are unique per owner and kind. Seeded default categories
//! are read-only.

use crate::audit::EntityType;
use crate::error::{ParcelaError, ParcelaResult};
use crate::models::{Category, CategoryId, CategoryKind, OwnerId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, owner: OwnerId, name: &str, kind: CategoryKind) -> ParcelaResult<Category> {
        let category = Category::new(owner, name.trim(), kind);
        category
            .validate()
            .map_err(|e| ParcelaError::validation("name", e.to_string()))?;
        self.ensure_unique(owner, kind, &category.name, None)?;

        self.storage.atomically(|storage| {
            storage.categories.upsert(category.clone())?;
            storage.log_create(
                EntityType::Category,
                category.id.full(),
                owner,
                Some(category.name.clone()),
                &category,
            )
        })?;

        Ok(category)
    }

    pub fn get(&self, owner: OwnerId, id: CategoryId) -> ParcelaResult<Category> {
        self.storage
            .categories
            .get(owner, id)?
            .ok_or_else(|| ParcelaError::category_not_found(id.to_string()))
    }

    /// Find a category by name or ID string
    ///
    /// A name that exists under both kinds needs `kind` to pick one.
    pub fn find(
        &self,
        owner: OwnerId,
        identifier: &str,
        kind: Option<CategoryKind>,
    ) -> ParcelaResult<Option<Category>> {
        let kinds = match kind {
            Some(kind) => vec![kind],
            None => vec![CategoryKind::Expense, CategoryKind::Income],
        };

        for kind in kinds {
            if let Some(category) = self.storage.categories.find_by_name(owner, kind, identifier)? {
                return Ok(Some(category));
            }
        }

        match identifier.parse::<CategoryId>() {
            Ok(id) => self.storage.categories.get(owner, id),
            Err(_) => Ok(None),
        }
    }

    pub fn resolve(
        &self,
        owner: OwnerId,
        identifier: &str,
        kind: Option<CategoryKind>,
    ) -> ParcelaResult<Category> {
        self.find(owner, identifier, kind)?
            .ok_or_else(|| ParcelaError::category_not_found(identifier))
    }

    pub fn list(&self, owner: OwnerId, kind: Option<CategoryKind>) -> ParcelaResult<Vec<Category>> {
        self.storage.categories.list(owner, kind)
    }

    /// Rename a user category
    pub fn rename(&self, owner: OwnerId, id: CategoryId, name: &str) -> ParcelaResult<Category> {
        let before = self.get(owner, id)?;
        if before.is_default {
            return Err(ParcelaError::Conflict(format!(
                "Default category '{}' cannot be edited",
                before.name
            )));
        }

        let mut category = before.clone();
        category.name = name.trim().to_string();
        category
            .validate()
            .map_err(|e| ParcelaError::validation("name", e.to_string()))?;
        self.ensure_unique(owner, category.kind, &category.name, Some(id))?;

        self.storage.atomically(|storage| {
            storage.categories.upsert(category.clone())?;
            storage.log_update(
                EntityType::Category,
                id.full(),
                owner,
                Some(category.name.clone()),
                &before,
                &category,
                Some(format!("name: {:?} -> {:?}", before.name, category.name)),
            )
        })?;

        Ok(category)
    }

    /// Delete a user category no transaction is filed under
    pub fn delete(&self, owner: OwnerId, id: CategoryId) -> ParcelaResult<Category> {
        let category = self.get(owner, id)?;

        if category.is_default {
            return Err(ParcelaError::Conflict(format!(
                "Default category '{}' cannot be deleted",
                category.name
            )));
        }

        if self.storage.transactions.references_category(id)? {
            return Err(ParcelaError::Conflict(format!(
                "Category '{}' has transactions and cannot be deleted",
                category.name
            )));
        }

        self.storage.atomically(|storage| {
            storage.categories.delete(id)?;
            storage.log_delete(
                EntityType::Category,
                id.full(),
                owner,
                Some(category.name.clone()),
                &category,
            )
        })?;

        Ok(category)
    }

    fn ensure_unique(
        &self,
        owner: OwnerId,
        kind: CategoryKind,
        name: &str,
        exclude: Option<CategoryId>,
    ) -> ParcelaResult<()> {
        match self.storage.categories.find_by_name(owner, kind, name)? {
            Some(existing) if Some(existing.id) != exclude => Err(ParcelaError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

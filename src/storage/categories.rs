//! Category repository, persisted to data/categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{Category, CategoryId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_poisoned;

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: CategoryData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(lock_poisoned)?;

        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| {
            a.owner_id
                .cmp(&b.owner_id)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.name.cmp(&b.name))
        });

        write_json_atomic(&self.path, &CategoryData { categories })
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// Categories owned by a user, in creation order
    pub fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<Category>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let mut list: Vec<_> = data
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(list)
    }

    /// Find one of a user's categories by name, ignoring case
    pub fn get_by_name(
        &self,
        owner_id: UserId,
        name: &str,
    ) -> Result<Option<Category>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|c| c.owner_id == owner_id && c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert or update a category
    pub fn upsert(&self, category: Category) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        data.insert(category.id, category);
        Ok(())
    }

    /// Delete a category, returning whether it existed
    pub fn delete(&self, id: CategoryId) -> Result<bool, SpendwiseError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        Ok(data.remove(&id).is_some())
    }
}

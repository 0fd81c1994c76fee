//! Category service
//!
//! Categories are created, listed and deleted as a whole; there is no partial
//! update. Names are unique per owner, compared case-insensitively.

use crate::audit::EntityType;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Category, CategoryId, UserId};
use crate::storage::Storage;

/// Service for one user's categories
pub struct CategoryService<'a> {
    storage: &'a Storage,
    owner: UserId,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage, owner: UserId) -> Self {
        Self { storage, owner }
    }

    /// Create a category with whole-unit min/max limits
    pub fn create(
        &self,
        name: &str,
        description: Option<&str>,
        min_limit: i64,
        max_limit: i64,
    ) -> SpendwiseResult<Category> {
        let mut category = Category::new(self.owner, name.trim(), min_limit, max_limit);
        if let Some(description) = description {
            category = category.with_description(description.trim());
        }

        self.insert(category)
    }

    /// Store an already built category under the same rules as `create`
    pub fn insert(&self, category: Category) -> SpendwiseResult<Category> {
        if category.owner_id != self.owner {
            return Err(SpendwiseError::Validation(format!(
                "Category '{}' belongs to another user",
                category.name
            )));
        }

        category
            .validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        if self
            .storage
            .categories
            .get_by_name(self.owner, &category.name)?
            .is_some()
        {
            return Err(SpendwiseError::Duplicate {
                entity_type: "Category",
                identifier: category.name.clone(),
            });
        }

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        log::info!("created category '{}'", category.name);

        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> SpendwiseResult<Option<Category>> {
        Ok(self
            .storage
            .categories
            .get(id)?
            .filter(|c| c.owner_id == self.owner))
    }

    /// All of the owner's categories, oldest first
    pub fn list(&self) -> SpendwiseResult<Vec<Category>> {
        self.storage.categories.get_by_owner(self.owner)
    }

    /// Find by name (case-insensitive) or by id / id prefix
    pub fn find(&self, identifier: &str) -> SpendwiseResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(self.owner, identifier)? {
            return Ok(Some(category));
        }

        let mut matches: Vec<_> = self
            .list()?
            .into_iter()
            .filter(|c| c.id.matches(identifier))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(SpendwiseError::Validation(format!(
                "'{}' matches more than one category",
                identifier
            ))),
        }
    }

    /// Delete a category
    ///
    /// Expenses filed under it are kept; aggregation simply stops matching
    /// them to a defined category.
    pub fn delete(&self, id: CategoryId) -> SpendwiseResult<Category> {
        let category = self
            .get(id)?
            .ok_or_else(|| SpendwiseError::category_not_found(id.to_string()))?;

        let in_use = self
            .storage
            .expenses
            .get_by_owner(self.owner)?
            .iter()
            .filter(|e| e.category == category.name)
            .count();
        if in_use > 0 {
            log::warn!(
                "deleting category '{}' still referenced by {} expenses",
                category.name,
                in_use
            );
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        log::info!("deleted category '{}'", category.name);

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendwisePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage, UserId::new());

        let food = service
            .create("  Food ", Some("groceries and takeaway"), 250, 700)
            .unwrap();
        assert_eq!(food.name, "Food");
        assert_eq!(food.description, "groceries and takeaway");

        assert_eq!(service.find("food").unwrap().unwrap().id, food.id);
        assert_eq!(service.find(&food.id.to_string()).unwrap().unwrap().id, food.id);
        assert!(service.find("Rent").unwrap().is_none());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage, UserId::new());

        assert!(service.create("   ", None, 0, 10).unwrap_err().is_validation());
        assert!(service.create(&"x".repeat(51), None, 0, 10).unwrap_err().is_validation());
        assert!(service.create("Food", None, -1, 10).unwrap_err().is_validation());

        let err = service.create("Food", None, 700, 250).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("exceeds"));

        service.create("Food", None, 0, 10).unwrap();
        assert!(matches!(
            service.create("FOOD", None, 0, 10),
            Err(SpendwiseError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_names_are_unique_per_owner_only() {
        let (_temp_dir, storage) = create_test_storage();
        CategoryService::new(&storage, UserId::new())
            .create("Food", None, 0, 10)
            .unwrap();
        assert!(CategoryService::new(&storage, UserId::new())
            .create("Food", None, 0, 10)
            .is_ok());
    }

    #[test]
    fn test_delete_is_owner_scoped() {
        let (_temp_dir, storage) = create_test_storage();
        let ana = CategoryService::new(&storage, UserId::new());
        let bo = CategoryService::new(&storage, UserId::new());
        let food = ana.create("Food", None, 0, 10).unwrap();

        assert!(bo.delete(food.id).unwrap_err().is_not_found());
        ana.delete(food.id).unwrap();
        assert!(ana.list().unwrap().is_empty());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
    }
}

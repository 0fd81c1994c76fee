//! Async store contracts for expenses and categories
//!
//! Reports and other readers depend on these traits rather than on the JSON
//! `Storage` directly. Date-range and per-category queries are not part of the
//! contract: callers fetch an owner's full list and hand it to the aggregator.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::SpendwiseResult;
use crate::models::{Category, CategoryId, Expense, ExpenseId, UserId};
use crate::services::{CategoryService, ExpenseService};
use crate::storage::Storage;

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Every expense owned by `owner`, newest first
    async fn list_expenses(&self, owner: UserId) -> SpendwiseResult<Vec<Expense>>;

    async fn get_expense(&self, id: ExpenseId) -> SpendwiseResult<Option<Expense>>;

    async fn insert_expense(&self, expense: Expense) -> SpendwiseResult<ExpenseId>;

    /// Returns whether the expense existed
    async fn delete_expense(&self, id: ExpenseId) -> SpendwiseResult<bool>;

    /// Returns how many of the ids existed
    async fn delete_expenses(&self, ids: &[ExpenseId]) -> SpendwiseResult<usize>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self, owner: UserId) -> SpendwiseResult<Vec<Category>>;

    async fn insert_category(&self, category: Category) -> SpendwiseResult<CategoryId>;

    /// Returns whether the category existed
    async fn delete_category(&self, id: CategoryId) -> SpendwiseResult<bool>;
}

// Writes go through the services so the store contract applies the same
// validation and audit trail as the CLI.
#[async_trait]
impl ExpenseStore for Storage {
    async fn list_expenses(&self, owner: UserId) -> SpendwiseResult<Vec<Expense>> {
        self.expenses.get_by_owner(owner)
    }

    async fn get_expense(&self, id: ExpenseId) -> SpendwiseResult<Option<Expense>> {
        self.expenses.get(id)
    }

    async fn insert_expense(&self, expense: Expense) -> SpendwiseResult<ExpenseId> {
        let service = ExpenseService::new(self, expense.owner_id);
        Ok(service.insert(expense)?.id)
    }

    async fn delete_expense(&self, id: ExpenseId) -> SpendwiseResult<bool> {
        match self.expenses.get(id)? {
            Some(expense) => {
                ExpenseService::new(self, expense.owner_id).delete(id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expenses(&self, ids: &[ExpenseId]) -> SpendwiseResult<usize> {
        let mut by_owner: HashMap<UserId, Vec<ExpenseId>> = HashMap::new();
        for id in ids {
            if let Some(expense) = self.expenses.get(*id)? {
                by_owner.entry(expense.owner_id).or_default().push(*id);
            }
        }

        let mut deleted = 0;
        for (owner, owned) in by_owner {
            deleted += ExpenseService::new(self, owner).delete_many(&owned)?;
        }
        Ok(deleted)
    }
}

#[async_trait]
impl CategoryStore for Storage {
    async fn list_categories(&self, owner: UserId) -> SpendwiseResult<Vec<Category>> {
        self.categories.get_by_owner(owner)
    }

    async fn insert_category(&self, category: Category) -> SpendwiseResult<CategoryId> {
        let service = CategoryService::new(self, category.owner_id);
        Ok(service.insert(category)?.id)
    }

    async fn delete_category(&self, id: CategoryId) -> SpendwiseResult<bool> {
        match self.categories.get(id)? {
            Some(category) => {
                CategoryService::new(self, category.owner_id).delete(id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

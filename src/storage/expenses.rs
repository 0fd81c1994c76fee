//! Expense repository, persisted to data/expenses.json
//!
//! Keeps a per-owner index so listing one user's expenses does not scan every
//! record in the file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{Expense, ExpenseId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Newest first; stored date text then creation time
fn newest_first(a: &Expense, b: &Expense) -> std::cmp::Ordering {
    b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at))
}

/// Repository for expense persistence with an owner index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: owner_id -> expense_ids
    by_owner: RwLock<HashMap<UserId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_owner: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build the owner index
    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_owner = self.by_owner.write().map_err(lock_poisoned)?;

        data.clear();
        by_owner.clear();

        for expense in file_data.expenses {
            by_owner.entry(expense.owner_id).or_default().push(expense.id);
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(newest_first);

        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// A user's expenses, newest first
    pub fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<Expense>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        let by_owner = self.by_owner.read().map_err(lock_poisoned)?;

        let ids = by_owner.get(&owner_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        expenses.sort_by(newest_first);
        Ok(expenses)
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_owner = self.by_owner.write().map_err(lock_poisoned)?;

        if let Some(previous) = data.get(&expense.id) {
            if previous.owner_id != expense.owner_id {
                if let Some(ids) = by_owner.get_mut(&previous.owner_id) {
                    ids.retain(|id| *id != expense.id);
                }
            }
        }

        let ids = by_owner.entry(expense.owner_id).or_default();
        if !ids.contains(&expense.id) {
            ids.push(expense.id);
        }

        data.insert(expense.id, expense);
        Ok(())
    }

    /// Delete an expense, returning whether it existed
    pub fn delete(&self, id: ExpenseId) -> Result<bool, SpendwiseError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        let mut by_owner = self.by_owner.write().map_err(lock_poisoned)?;

        match data.remove(&id) {
            Some(expense) => {
                if let Some(ids) = by_owner.get_mut(&expense.owner_id) {
                    ids.retain(|existing| *existing != id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete several expenses, returning how many existed
    pub fn delete_many(&self, ids: &[ExpenseId]) -> Result<usize, SpendwiseError> {
        let mut deleted = 0;
        for id in ids {
            if self.delete(*id)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    pub fn count(&self) -> Result<usize, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    fn expense(owner: UserId, day: u32, cents: i64) -> Expense {
        Expense::new(
            owner,
            "item",
            "Food",
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            Money::from_cents(cents),
        )
    }

    #[test]
    fn test_owner_index_orders_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let ana = UserId::new();
        let bo = UserId::new();

        repo.upsert(expense(ana, 1, 100)).unwrap();
        repo.upsert(expense(ana, 9, 200)).unwrap();
        repo.upsert(expense(bo, 5, 300)).unwrap();

        let list = repo.get_by_owner(ana).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].date, "2024-05-09");
        assert_eq!(repo.get_by_owner(bo).unwrap().len(), 1);
        assert!(repo.get_by_owner(UserId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_does_not_duplicate_index_entries() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = UserId::new();
        let mut item = expense(owner, 1, 100);

        repo.upsert(item.clone()).unwrap();
        item.amount = Money::from_cents(150);
        repo.upsert(item).unwrap();

        let list = repo.get_by_owner(owner).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].amount, Money::from_cents(150));
    }

    #[test]
    fn test_delete_many_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let owner = UserId::new();
        let a = expense(owner, 1, 100);
        let b = expense(owner, 2, 200);
        let c = expense(owner, 3, 300);
        let ids = vec![a.id, b.id, ExpenseId::new()];

        repo.upsert(a).unwrap();
        repo.upsert(b).unwrap();
        repo.upsert(c.clone()).unwrap();

        assert_eq!(repo.delete_many(&ids).unwrap(), 2);
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_by_owner(owner).unwrap(), vec![c]);
    }
}

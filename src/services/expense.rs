//! Expense service
//!
//! Expenses are created from user input, replaced as a whole on edit and
//! deleted by id, by a list of ids or by name. The category must name one of
//! the owner's existing categories at the time of writing.

use chrono::{NaiveDate, Utc};

use crate::audit::{generate_diff, AuditEntry, EntityType};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{DateRange, Expense, ExpenseId, Money, UserId};
use crate::storage::Storage;

/// Service for one user's expenses
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    owner: UserId,
}

/// Options for filtering expense listings
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Exact category name
    pub category: Option<String>,
    /// Inclusive date range; records with unparseable dates never match
    pub range: Option<DateRange>,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = &self.category {
            if &expense.category != category {
                return false;
            }
        }

        match &self.range {
            Some(range) => expense.parsed_date().is_some_and(|d| range.contains(d)),
            None => true,
        }
    }
}

/// Input for creating or replacing an expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub name: String,
    pub category: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage, owner: UserId) -> Self {
        Self { storage, owner }
    }

    /// Resolve the category name to its stored spelling
    fn resolve_category(&self, category: &str) -> SpendwiseResult<String> {
        self.storage
            .categories
            .get_by_name(self.owner, category)?
            .map(|c| c.name)
            .ok_or_else(|| SpendwiseError::category_not_found(category.trim()))
    }

    fn construct(&self, input: CreateExpenseInput) -> Expense {
        let mut expense = Expense::new(
            self.owner,
            input.name.trim(),
            input.category,
            input.date,
            input.amount,
        );
        expense.description = input.description.unwrap_or_default().trim().to_string();
        expense.image = input
            .image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        expense
    }

    /// Check ownership, resolve the category and validate
    fn prepare(&self, mut expense: Expense) -> SpendwiseResult<Expense> {
        if expense.owner_id != self.owner {
            return Err(SpendwiseError::Validation(format!(
                "Expense {} belongs to another user",
                expense.id
            )));
        }

        expense.category = self.resolve_category(&expense.category)?;
        expense
            .validate()
            .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

        Ok(expense)
    }

    pub fn create(&self, input: CreateExpenseInput) -> SpendwiseResult<Expense> {
        self.insert(self.construct(input))
    }

    /// Store an already built expense under the same rules as `create`
    pub fn insert(&self, expense: Expense) -> SpendwiseResult<Expense> {
        let expense = self.prepare(expense)?;
        if self.storage.expenses.get(expense.id)?.is_some() {
            return Err(SpendwiseError::Duplicate {
                entity_type: "Expense",
                identifier: expense.id.to_string(),
            });
        }

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &expense,
        )?;
        log::info!("recorded expense {} ({})", expense.id, expense.amount);

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> SpendwiseResult<Option<Expense>> {
        Ok(self
            .storage
            .expenses
            .get(id)?
            .filter(|e| e.owner_id == self.owner))
    }

    /// Find by full id or id prefix
    pub fn find(&self, identifier: &str) -> SpendwiseResult<Option<Expense>> {
        if let Ok(id) = identifier.trim().parse::<ExpenseId>() {
            return self.get(id);
        }

        let mut matches: Vec<_> = self
            .storage
            .expenses
            .get_by_owner(self.owner)?
            .into_iter()
            .filter(|e| e.id.matches(identifier))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(SpendwiseError::Validation(format!(
                "'{}' matches more than one expense",
                identifier
            ))),
        }
    }

    /// The owner's expenses matching `filter`, newest first
    pub fn list(&self, filter: &ExpenseFilter) -> SpendwiseResult<Vec<Expense>> {
        let mut expenses: Vec<_> = self
            .storage
            .expenses
            .get_by_owner(self.owner)?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();

        // Parsed date first so unpadded legacy dates still sort correctly
        expenses.sort_by(|a, b| {
            b.parsed_date()
                .cmp(&a.parsed_date())
                .then(b.created_at.cmp(&a.created_at))
        });

        if let Some(limit) = filter.limit {
            expenses.truncate(limit);
        }

        Ok(expenses)
    }

    /// Replace every user-editable field of an expense
    pub fn update(&self, id: ExpenseId, input: CreateExpenseInput) -> SpendwiseResult<Expense> {
        let before = self
            .get(id)?
            .ok_or_else(|| SpendwiseError::expense_not_found(id.to_string()))?;

        let replacement = self.prepare(self.construct(input))?;
        let expense = Expense {
            id: before.id,
            owner_id: before.owner_id,
            created_at: before.created_at,
            updated_at: Utc::now(),
            ..replacement
        };

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        let diff = match (
            serde_json::to_value(&before),
            serde_json::to_value(&expense),
        ) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("could not diff expense {} for the audit log: {}", expense.id, e);
                None
            }
        };
        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &before,
            &expense,
            diff,
        )?;

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> SpendwiseResult<Expense> {
        let expense = self
            .get(id)?
            .ok_or_else(|| SpendwiseError::expense_not_found(id.to_string()))?;

        self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &expense,
        )?;
        log::info!("deleted expense {}", expense.id);

        Ok(expense)
    }

    /// Delete several expenses; ids not owned by this user are ignored
    pub fn delete_many(&self, ids: &[ExpenseId]) -> SpendwiseResult<usize> {
        let mut doomed = Vec::new();
        for id in ids {
            if let Some(expense) = self.get(*id)? {
                doomed.push(expense);
            }
        }
        self.remove_all(doomed)
    }

    /// Delete every expense with exactly this name, returning the count
    pub fn delete_by_name(&self, name: &str) -> SpendwiseResult<usize> {
        let name = name.trim();
        let doomed: Vec<_> = self
            .storage
            .expenses
            .get_by_owner(self.owner)?
            .into_iter()
            .filter(|e| e.name == name)
            .collect();
        self.remove_all(doomed)
    }

    fn remove_all(&self, doomed: Vec<Expense>) -> SpendwiseResult<usize> {
        if doomed.is_empty() {
            return Ok(0);
        }

        let ids: Vec<_> = doomed.iter().map(|e| e.id).collect();
        let deleted = self.storage.expenses.delete_many(&ids)?;
        self.storage.expenses.save()?;

        let entries: Vec<_> = doomed
            .iter()
            .map(|e| {
                AuditEntry::delete(EntityType::Expense, e.id.to_string(), Some(e.name.clone()), e)
            })
            .collect();
        self.storage.log_batch(&entries)?;
        log::info!("deleted {} expenses", deleted);

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendwisePaths;
    use crate::models::Category;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn setup_owner(storage: &Storage) -> UserId {
        let owner = UserId::new();
        storage
            .categories
            .upsert(Category::new(owner, "Food", 250, 700))
            .unwrap();
        storage
            .categories
            .upsert(Category::new(owner, "Transport", 0, 100))
            .unwrap();
        owner
    }

    fn input(name: &str, category: &str, day: u32, amount: &str) -> CreateExpenseInput {
        CreateExpenseInput {
            name: name.into(),
            category: category.into(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            amount: Money::parse(amount).unwrap(),
            description: None,
            image: None,
        }
    }

    #[test]
    fn test_create_resolves_category_spelling() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = setup_owner(&storage);
        let service = ExpenseService::new(&storage, owner);

        let expense = service.create(input("Lunch", "food", 2, "25.5")).unwrap();
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.date, "2024-05-02");
        assert_eq!(expense.amount, Money::from_cents(2550));
    }

    #[test]
    fn test_create_rejects_unknown_category_and_bad_values() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = setup_owner(&storage);
        let service = ExpenseService::new(&storage, owner);

        assert!(service
            .create(input("Movie", "Entertainment", 2, "12"))
            .unwrap_err()
            .is_not_found());
        assert!(service.create(input("", "Food", 2, "12")).unwrap_err().is_validation());
        assert!(service
            .create(input("Refund", "Food", 2, "-3"))
            .unwrap_err()
            .is_validation());
        assert!(storage.expenses.get_by_owner(owner).unwrap().is_empty());
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = setup_owner(&storage);
        let service = ExpenseService::new(&storage, owner);

        service.create(input("Groceries", "Food", 1, "50")).unwrap();
        service.create(input("Lunch", "Food", 2, "25.5")).unwrap();
        service.create(input("Bus", "Transport", 1, "10")).unwrap();
        service.create(input("Dinner", "Food", 20, "40")).unwrap();

        let all = service.list(&ExpenseFilter::new()).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].name, "Dinner");

        let first_days = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        )
        .unwrap();
        let early_food = service
            .list(&ExpenseFilter::new().category("Food").range(first_days))
            .unwrap();
        assert_eq!(early_food.len(), 2);

        assert_eq!(service.list(&ExpenseFilter::new().limit(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_update_replaces_and_audits_diff() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = setup_owner(&storage);
        let service = ExpenseService::new(&storage, owner);

        let original = service.create(input("Lunch", "Food", 2, "25.5")).unwrap();
        let mut replacement = input("Lunch", "Food", 2, "30");
        replacement.description = Some("with tip".into());

        let updated = service.update(original.id, replacement).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.amount, Money::from_cents(3000));
        assert_eq!(storage.expenses.count().unwrap(), 1);

        let entries = storage.audit().read_all().unwrap();
        let diff = entries.last().unwrap().diff_summary.clone().unwrap();
        assert!(diff.contains("amount: 2550 -> 3000"));
        assert!(diff.contains("description"));
    }

    #[test]
    fn test_find_by_prefix() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = setup_owner(&storage);
        let service = ExpenseService::new(&storage, owner);
        let expense = service.create(input("Lunch", "Food", 2, "25.5")).unwrap();

        let short = expense.id.to_string();
        assert_eq!(service.find(&short).unwrap().unwrap().id, expense.id);
        assert_eq!(
            service.find(&expense.id.as_uuid().to_string()).unwrap().unwrap().id,
            expense.id
        );
        assert!(service.find("exp-").unwrap().is_none());
    }

    #[test]
    fn test_delete_variants() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = setup_owner(&storage);
        let service = ExpenseService::new(&storage, owner);

        let a = service.create(input("Coffee", "Food", 1, "3")).unwrap();
        let b = service.create(input("Coffee", "Food", 2, "3")).unwrap();
        let c = service.create(input("Bus", "Transport", 2, "2")).unwrap();
        let d = service.create(input("Lunch", "Food", 3, "12")).unwrap();

        service.delete(d.id).unwrap();
        assert!(service.delete(d.id).unwrap_err().is_not_found());

        assert_eq!(service.delete_by_name("Coffee").unwrap(), 2);
        assert!(service.get(a.id).unwrap().is_none());
        assert!(service.get(b.id).unwrap().is_none());

        let stranger = ExpenseService::new(&storage, UserId::new());
        assert_eq!(stranger.delete_many(&[c.id]).unwrap(), 0);
        assert_eq!(service.delete_many(&[c.id, ExpenseId::new()]).unwrap(), 1);
        assert!(service.list(&ExpenseFilter::new()).unwrap().is_empty());
    }
}

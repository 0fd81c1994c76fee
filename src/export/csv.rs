//! CSV export of a user's expenses

use std::io::Write;

use serde::Serialize;

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::UserId;
use crate::storage::Storage;

#[derive(Serialize)]
struct ExpenseRecord<'a> {
    id: String,
    date: &'a str,
    name: &'a str,
    category: &'a str,
    amount: String,
    description: &'a str,
    image: &'a str,
}

/// Write one row per expense, newest first; returns the row count
pub fn export_expenses_csv<W: Write>(
    storage: &Storage,
    owner: UserId,
    writer: W,
) -> SpendwiseResult<usize> {
    let expenses = storage.expenses.get_by_owner(owner)?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    for expense in &expenses {
        csv_writer
            .serialize(ExpenseRecord {
                id: expense.id.as_uuid().to_string(),
                date: &expense.date,
                name: &expense.name,
                category: &expense.category,
                amount: expense.amount.to_string(),
                description: &expense.description,
                image: expense.image.as_deref().unwrap_or(""),
            })
            .map_err(|e| SpendwiseError::Export(e.to_string()))?;
    }

    if expenses.is_empty() {
        csv_writer
            .write_record(["id", "date", "name", "category", "amount", "description", "image"])
            .map_err(|e| SpendwiseError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| SpendwiseError::Export(e.to_string()))?;
    Ok(expenses.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendwisePaths;
    use crate::models::{Expense, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_quotes_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let owner = UserId::new();
        let mut expense = Expense::new(
            owner,
            "Pizza, large",
            "Food",
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            Money::from_cents(1899),
        );
        expense.description = "said \"extra cheese\"".into();
        storage.expenses.upsert(expense).unwrap();

        let mut out = Vec::new();
        assert_eq!(export_expenses_csv(&storage, owner, &mut out).unwrap(), 1);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,date,name,category,amount,description,image"
        );
        let row = lines.next().unwrap();
        assert!(row.contains(",2024-05-02,\"Pizza, large\",Food,18.99,"));
        assert!(row.contains("\"said \"\"extra cheese\"\"\""));
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let (_temp_dir, storage) = create_test_storage();
        let mut out = Vec::new();
        assert_eq!(export_expenses_csv(&storage, UserId::new(), &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            "id,date,name,category,amount,description,image"
        );
    }
}

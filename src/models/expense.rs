//! Expense model
//!
//! The date is kept as the stored `YYYY-MM-DD` text and parsed on demand, so a
//! record with a damaged date still loads and can be listed, fixed or deleted.
//! Aggregation skips such records instead of failing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, UserId};
use super::money::Money;

/// Storage format for expense dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored or user-typed expense date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// A single recorded spending transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// The user this expense belongs to
    pub owner_id: UserId,

    pub name: String,

    /// Name of the category this expense is filed under
    pub category: String,

    /// Date as stored, normally zero-padded `YYYY-MM-DD`
    pub date: String,

    pub amount: Money,

    #[serde(default)]
    pub description: String,

    /// Opaque receipt image reference (path or URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
        amount: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            owner_id,
            name: name.into(),
            category: category.into(),
            date: date.format(DATE_FORMAT).to_string(),
            amount,
            description: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The parsed date, or `None` if the stored text is not a valid date
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date.format(DATE_FORMAT).to_string();
    }

    /// Whether aggregation can use this record
    pub fn is_well_formed(&self) -> bool {
        self.parsed_date().is_some() && !self.amount.is_negative()
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }

        if self.category.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyCategory);
        }

        if self.parsed_date().is_none() {
            return Err(ExpenseValidationError::InvalidDate(self.date.clone()));
        }

        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount);
        }

        if self.amount > Money::max_amount() {
            return Err(ExpenseValidationError::AmountTooLarge);
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.name, self.amount)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    EmptyCategory,
    InvalidDate(String),
    NegativeAmount,
    AmountTooLarge,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Expense name cannot be empty"),
            Self::EmptyCategory => write!(f, "Expense category cannot be empty"),
            Self::InvalidDate(date) => {
                write!(f, "Invalid expense date '{}', expected YYYY-MM-DD", date)
            }
            Self::NegativeAmount => write!(f, "Expense amount cannot be negative"),
            Self::AmountTooLarge => {
                write!(f, "Expense amount cannot exceed {}", Money::max_amount())
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn test_new_expense_pads_date() {
        let expense = Expense::new(UserId::new(), "Lunch", "Food", may(2), Money::from_cents(2550));
        assert_eq!(expense.date, "2024-05-02");
        assert_eq!(expense.parsed_date(), Some(may(2)));
        assert!(expense.is_well_formed());
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_unparseable_date() {
        let mut expense = Expense::new(UserId::new(), "Lunch", "Food", may(2), Money::from_cents(100));
        expense.date = "2024-13-40".into();

        assert!(expense.parsed_date().is_none());
        assert!(!expense.is_well_formed());
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::InvalidDate("2024-13-40".into()))
        );
    }

    #[test]
    fn test_negative_amount_is_malformed() {
        let expense = Expense::new(UserId::new(), "Refund", "Food", may(3), Money::from_cents(-500));
        assert!(!expense.is_well_formed());
        assert_eq!(expense.validate(), Err(ExpenseValidationError::NegativeAmount));
    }

    #[test]
    fn test_amount_is_capped() {
        let owner = UserId::new();
        let at_cap = Expense::new(owner, "Yacht", "Fun", may(5), Money::max_amount());
        assert!(at_cap.validate().is_ok());

        let huge = Expense::new(owner, "Yacht", "Fun", may(5), Money::parse("50000000000000000").unwrap());
        assert_eq!(huge.validate(), Err(ExpenseValidationError::AmountTooLarge));
    }

    #[test]
    fn test_empty_fields() {
        let owner = UserId::new();
        let no_name = Expense::new(owner, " ", "Food", may(1), Money::zero());
        assert_eq!(no_name.validate(), Err(ExpenseValidationError::EmptyName));

        let no_category = Expense::new(owner, "Bus", "", may(1), Money::zero());
        assert_eq!(no_category.validate(), Err(ExpenseValidationError::EmptyCategory));
    }

    #[test]
    fn test_image_is_optional_in_json() {
        let expense = Expense::new(UserId::new(), "Taxi", "Transport", may(4), Money::from_cents(1000));
        let json = serde_json::to_string(&expense).unwrap();
        assert!(!json.contains("image"));

        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expense);
    }
}

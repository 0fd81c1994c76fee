//! Core data models: users, categories, expenses and shared members

pub mod category;
pub mod date_range;
pub mod expense;
pub mod ids;
pub mod money;
pub mod shared_user;
pub mod user;

pub use category::{Category, CategoryValidationError};
pub use date_range::{DateRange, DateRangeError};
pub use expense::{parse_date, Expense, ExpenseValidationError, DATE_FORMAT};
pub use ids::{CategoryId, ExpenseId, SharedUserId, UserId};
pub use money::{Money, MoneyParseError, MAX_UNITS};
pub use shared_user::{SharedUser, SharedUserValidationError};
pub use user::User;

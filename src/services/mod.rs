//! Service layer for Spendwise
//!
//! Services validate input, write through the storage repositories and record
//! an audit entry for every change. All but `AuthService` are scoped to one
//! owning user.

pub mod auth;
pub mod category;
pub mod expense;
pub mod shared;

pub use auth::AuthService;
pub use category::CategoryService;
pub use expense::{CreateExpenseInput, ExpenseFilter, ExpenseService};
pub use shared::SharedBudgetService;

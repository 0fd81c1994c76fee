//! Display formatting for terminal output

pub mod category;
pub mod expense;
pub mod report;
pub mod shared;

pub use category::{format_category_details, format_category_list};
pub use expense::{format_expense_details, format_expense_list};
pub use shared::format_member_list;

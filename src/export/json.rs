//! Full JSON export of one user's data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Category, Expense, Money, SharedUser, User, UserId};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// The exporting account, without its password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for ExportedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub user: ExportedUser,
    pub categories: Vec<Category>,
    pub expenses: Vec<Expense>,
    pub shared_users: Vec<SharedUser>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub category_count: usize,
    pub expense_count: usize,
    pub shared_user_count: usize,
    /// Sum of every expense amount, malformed records included
    pub total_recorded: Money,
    pub earliest_expense: Option<String>,
    pub latest_expense: Option<String>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage, user: &User) -> SpendwiseResult<Self> {
        let categories = storage.categories.get_by_owner(user.id)?;
        let expenses = storage.expenses.get_by_owner(user.id)?;
        let shared_users = storage.shared_users.get_by_owner(user.id)?;

        let dates: Vec<_> = expenses.iter().filter_map(|e| e.parsed_date()).collect();

        let metadata = ExportMetadata {
            category_count: categories.len(),
            expense_count: expenses.len(),
            shared_user_count: shared_users.len(),
            total_recorded: expenses.iter().map(|e| e.amount).sum(),
            earliest_expense: dates.iter().min().map(|d| d.to_string()),
            latest_expense: dates.iter().max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user: ExportedUser::from(user),
            categories,
            expenses,
            shared_users,
            metadata,
        })
    }
}

pub fn export_full_json<W: Write>(
    storage: &Storage,
    user: &User,
    writer: &mut W,
    pretty: bool,
) -> SpendwiseResult<()> {
    let export = FullExport::from_storage(storage, user)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| SpendwiseError::Export(e.to_string()))
}

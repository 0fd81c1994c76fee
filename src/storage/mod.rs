//! Storage layer for Spendwise
//!
//! JSON files under the data directory, one per entity kind, with atomic
//! writes. Each repository keeps its records in memory behind a `RwLock` and
//! persists them on `save`.

pub mod categories;
pub mod expenses;
pub mod file_io;
pub mod init;
pub mod shared_users;
pub mod users;

pub use categories::CategoryRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{default_categories, initialize_storage};
pub use shared_users::SharedUserRepository;
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::SpendwisePaths;
use crate::error::{SpendwiseError, SpendwiseResult};

/// Map a poisoned lock into a storage error
pub(crate) fn lock_poisoned<E: std::fmt::Display>(e: E) -> SpendwiseError {
    SpendwiseError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SpendwisePaths,
    pub users: UserRepository,
    pub categories: CategoryRepository,
    pub expenses: ExpenseRepository,
    pub shared_users: SharedUserRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a storage handle; directories are created, nothing is loaded
    pub fn new(paths: SpendwisePaths) -> Result<Self, SpendwiseError> {
        paths.ensure_directories()?;

        Ok(Self {
            users: UserRepository::new(paths.users_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            shared_users: SharedUserRepository::new(paths.shared_users_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &SpendwisePaths {
        &self.paths
    }

    pub fn load_all(&mut self) -> Result<(), SpendwiseError> {
        self.users.load()?;
        self.categories.load()?;
        self.expenses.load()?;
        self.shared_users.load()?;
        log::debug!("loaded data from {}", self.paths.data_dir().display());
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), SpendwiseError> {
        self.users.save()?;
        self.categories.save()?;
        self.expenses.save()?;
        self.shared_users.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> SpendwiseResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> SpendwiseResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> SpendwiseResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_batch(&self, entries: &[AuditEntry]) -> SpendwiseResult<()> {
        self.audit.log_batch(entries)
    }
}

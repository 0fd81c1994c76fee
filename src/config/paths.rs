//! Path management for Spendwise
//!
//! ## Path Resolution Order
//!
//! 1. `SPENDWISE_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory reported by `directories`
//!    (`~/.config/spendwise` on Linux, `%APPDATA%\spendwise\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SpendwiseError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SPENDWISE_DATA_DIR";

/// Resolves every file Spendwise reads or writes
#[derive(Debug, Clone)]
pub struct SpendwisePaths {
    base_dir: PathBuf,
}

impl SpendwisePaths {
    /// Resolve paths from the environment or the platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SpendwiseError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "spendwise")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    SpendwiseError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, alternate profiles)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the JSON data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn shared_users_file(&self) -> PathBuf {
        self.data_dir().join("shared_users.json")
    }

    /// Create the base and data directories if they are missing
    pub fn ensure_directories(&self) -> Result<(), SpendwiseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SpendwiseError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SpendwiseError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether `spendwise init` (or any settings save) has run here
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

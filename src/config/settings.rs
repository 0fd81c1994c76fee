//! User settings for Spendwise
//!
//! Display preferences plus the current login session. Every field has a serde
//! default so older config files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::SpendwisePaths;
use crate::error::SpendwiseError;
use crate::models::UserId;

/// Persisted settings (`config.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format used when printing dates (strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Create the starter categories when a user registers
    #[serde(default = "default_seed_categories")]
    pub seed_default_categories: bool,

    /// The logged-in user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_user: Option<UserId>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_seed_categories() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            seed_default_categories: default_seed_categories(),
            active_user: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if no file exists yet
    pub fn load_or_create(paths: &SpendwisePaths) -> Result<Self, SpendwiseError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| SpendwiseError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| SpendwiseError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SpendwisePaths) -> Result<(), SpendwiseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SpendwiseError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SpendwiseError::Io(format!("Failed to write settings file: {}", e)))?;

        log::debug!("settings saved to {}", paths.settings_file().display());
        Ok(())
    }
}

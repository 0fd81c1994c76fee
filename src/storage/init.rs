//! First-run setup and starter data

use crate::config::paths::SpendwisePaths;
use crate::config::settings::Settings;
use crate::error::SpendwiseError;
use crate::models::{Category, UserId};

/// Starter categories for a new account: (name, min, max) in whole units
const DEFAULT_CATEGORIES: &[(&str, i64, i64)] = &[
    ("Food", 250, 700),
    ("Transport", 50, 200),
    ("Housing", 800, 1500),
    ("Utilities", 100, 300),
    ("Entertainment", 0, 150),
    ("Health", 0, 200),
];

/// Create the directory layout and settings file if missing
///
/// Existing settings are left untouched and returned.
pub fn initialize_storage(paths: &SpendwisePaths) -> Result<Settings, SpendwiseError> {
    paths.ensure_directories()?;

    let existed = paths.settings_file().exists();
    let settings = Settings::load_or_create(paths)?;
    if !existed {
        settings.save(paths)?;
        log::info!("initialized storage at {}", paths.base_dir().display());
    }

    Ok(settings)
}

/// The starter category set for a newly registered user
pub fn default_categories(owner_id: UserId) -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, min, max)| Category::new(owner_id, *name, *min, *max))
        .collect()
}

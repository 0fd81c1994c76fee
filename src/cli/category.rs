//! Category CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::category::{format_category_details, format_category_list};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::services::CategoryService;
use crate::storage::Storage;

use super::require_user;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List your categories and their limits
    List,

    /// Create a category
    #[command(alias = "create")]
    Add {
        /// Category name
        name: String,
        /// Planned minimum spend, whole units
        #[arg(long, default_value_t = 0)]
        min: i64,
        /// Planned maximum spend, whole units (0 means no limit)
        #[arg(long, default_value_t = 0)]
        max: i64,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
    },
}

pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> SpendwiseResult<()> {
    let user = require_user(storage, settings)?;
    let service = CategoryService::new(storage, user.id);

    match cmd {
        CategoryCommands::List => {
            println!("{}", format_category_list(&service.list()?));
        }

        CategoryCommands::Add {
            name,
            min,
            max,
            description,
        } => {
            let category = service.create(&name, description.as_deref(), min, max)?;
            println!("Created category: {}", category.name);
            println!("  Limits: {} to {}", category.min_limit, category.max_limit);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let found = service
                .find(&category)?
                .ok_or_else(|| SpendwiseError::category_not_found(&category))?;
            print!("{}", format_category_details(&found));
        }

        CategoryCommands::Delete { category } => {
            let found = service
                .find(&category)?
                .ok_or_else(|| SpendwiseError::category_not_found(&category))?;
            let deleted = service.delete(found.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}

//! Shared budgeting CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::shared::format_member_list;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::services::SharedBudgetService;
use crate::storage::Storage;

use super::require_user;

#[derive(Subcommand)]
pub enum SharedCommands {
    /// List members sharing your budget
    List,

    /// Replace the member list
    Set {
        /// Members as "Name <email>"
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// Remove every member
    Clear,
}

/// Parse "Name <email>" into its parts
pub fn parse_member(s: &str) -> SpendwiseResult<(String, String)> {
    let invalid = || {
        SpendwiseError::Validation(format!(
            "Invalid member '{}', expected \"Name <email>\"",
            s
        ))
    };

    let (name, rest) = s.split_once('<').ok_or_else(invalid)?;
    let email = rest.trim().strip_suffix('>').ok_or_else(invalid)?;
    Ok((name.trim().to_string(), email.trim().to_string()))
}

pub fn handle_shared_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SharedCommands,
) -> SpendwiseResult<()> {
    let user = require_user(storage, settings)?;
    let service = SharedBudgetService::new(storage, user.id);

    match cmd {
        SharedCommands::List => {
            println!("{}", format_member_list(&service.list_members()?));
        }

        SharedCommands::Set { members } => {
            let pairs = members
                .iter()
                .map(|m| parse_member(m))
                .collect::<SpendwiseResult<Vec<_>>>()?;
            let saved = service.replace_members(&pairs)?;
            println!("Shared with {} member(s).", saved.len());
        }

        SharedCommands::Clear => {
            service.replace_members(&[])?;
            println!("Removed all shared members.");
        }
    }

    Ok(())
}

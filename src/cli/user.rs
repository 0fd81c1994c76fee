//! Account CLI commands

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::config::paths::SpendwisePaths;
use crate::config::settings::Settings;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::services::AuthService;
use crate::storage::Storage;

/// Environment variable consulted before prompting for a password
pub const PASSWORD_ENV: &str = "SPENDWISE_PASSWORD";

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account and log in
    Register {
        name: String,
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Log in to an existing account
    Login {
        email: String,
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Log out
    Logout,

    /// Show the logged-in account
    Whoami,
}

fn read_password(given: Option<String>, prompt: &str) -> SpendwiseResult<Zeroizing<String>> {
    match given {
        Some(password) => Ok(Zeroizing::new(password)),
        None => rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| SpendwiseError::Io(format!("Failed to read password: {}", e))),
    }
}

pub fn handle_user_command(
    storage: &Storage,
    settings: &mut Settings,
    paths: &SpendwisePaths,
    cmd: UserCommands,
) -> SpendwiseResult<()> {
    let service = AuthService::new(storage);

    match cmd {
        UserCommands::Register {
            name,
            email,
            password,
        } => {
            let password = read_password(password, "Choose a password: ")?;
            let user = service.register(
                &name,
                &email,
                &password,
                settings.seed_default_categories,
            )?;

            settings.active_user = Some(user.id);
            settings.save(paths)?;

            println!("Registered {}", user);
            println!("  ID: {}", user.id);
            if settings.seed_default_categories {
                println!();
                println!("Starter categories were created. Run 'spendwise category list' to see them.");
            }
        }

        UserCommands::Login { email, password } => {
            let password = read_password(password, "Password: ")?;
            let user = service.login(&email, &password)?;

            settings.active_user = Some(user.id);
            settings.save(paths)?;
            println!("Logged in as {}", user);
        }

        UserCommands::Logout => {
            if settings.active_user.take().is_some() {
                settings.save(paths)?;
                println!("Logged out.");
            } else {
                println!("Not logged in.");
            }
        }

        UserCommands::Whoami => {
            let user = service.current_user(settings.active_user)?;
            println!("{}", user);
            println!("  ID:     {}", user.id);
            println!("  Since:  {}", user.created_at.format("%Y-%m-%d"));
        }
    }

    Ok(())
}

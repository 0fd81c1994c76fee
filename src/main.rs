use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use spendwise::cli::{
    handle_category_command, handle_expense_command, handle_export_command,
    handle_report_command, handle_shared_command, handle_user_command, CategoryCommands,
    ExpenseCommands, ExportFormat, ReportCommands, SharedCommands, UserCommands,
};
use spendwise::config::{paths::SpendwisePaths, settings::Settings};
use spendwise::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendwise",
    version,
    about = "Track expenses against per-category spending limits",
    long_about = "Spendwise records your expenses by category and compares what \
                  you spend each month against the minimum and maximum you set \
                  for every category."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show configuration
    Config,

    /// Show recent audit log entries
    Audit {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Register, log in and out
    #[command(subcommand)]
    User(UserCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Expense management commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Spending reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Share your budget with others
    #[command(subcommand)]
    Shared(SharedCommands),

    /// Export your data
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or("SPENDWISE_LOG", "warn")).init();

    let cli = Cli::parse();

    let paths = SpendwisePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Spendwise at: {}", paths.data_dir().display());
            spendwise::storage::init::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'spendwise user register <name> <email>' to create an account.");
        }
        Some(Commands::Config) => {
            println!("Spendwise Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Seed categories: {}", settings.seed_default_categories);
            match settings.active_user {
                Some(id) => println!("  Logged in as:    {}", id),
                None => println!("  Logged in as:    (nobody)"),
            }
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &mut settings, &paths, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd).await?;
        }
        Some(Commands::Shared(cmd)) => {
            handle_shared_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export { format, output }) => {
            handle_export_command(&storage, &settings, format, output)?;
        }
        None => {
            println!("Spendwise - expense tracking with spending limits");
            println!();
            println!("Run 'spendwise --help' for usage information.");
        }
    }

    Ok(())
}

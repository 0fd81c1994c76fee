//! CLI command handlers
//!
//! Each submodule pairs a clap `Subcommand` enum with a handler that calls
//! into the service layer and prints the result.

pub mod category;
pub mod expense;
pub mod export;
pub mod report;
pub mod shared;
pub mod user;

pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportFormat};
pub use report::{handle_report_command, ReportCommands};
pub use shared::{handle_shared_command, SharedCommands};
pub use user::{handle_user_command, UserCommands};

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::config::settings::Settings;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{parse_date, DateRange, User};
use crate::services::AuthService;
use crate::storage::Storage;

/// The logged-in user, or an authentication error
pub fn require_user(storage: &Storage, settings: &Settings) -> SpendwiseResult<User> {
    AuthService::new(storage).current_user(settings.active_user)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date_arg(s: &str) -> SpendwiseResult<NaiveDate> {
    parse_date(s).ok_or_else(|| {
        SpendwiseError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
    })
}

/// Date range options shared by listing and report commands
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,

    /// A whole month (YYYY-MM)
    #[arg(short, long, conflicts_with_all = ["from", "to", "all"])]
    pub month: Option<String>,

    /// Every date
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub all: bool,
}

impl RangeArgs {
    /// Resolve to a concrete range; no options means the current month
    ///
    /// A missing end of an open range extends to the earliest or latest
    /// representable date.
    pub fn resolve(&self, today: NaiveDate) -> SpendwiseResult<DateRange> {
        if self.all {
            return Ok(DateRange::all_time());
        }

        if let Some(month) = &self.month {
            return DateRange::parse_month(month)
                .map_err(|e| SpendwiseError::Validation(e.to_string()));
        }

        if self.from.is_none() && self.to.is_none() {
            return Ok(DateRange::month_of(today));
        }

        let unbounded = DateRange::all_time();
        let from = match &self.from {
            Some(s) => parse_date_arg(s)?,
            None => unbounded.from,
        };
        let to = match &self.to {
            Some(s) => parse_date_arg(s)?,
            None => unbounded.to,
        };

        DateRange::new(from, to).map_err(|e| SpendwiseError::Validation(e.to_string()))
    }

    /// Whether any option was given
    pub fn is_set(&self) -> bool {
        self.all || self.month.is_some() || self.from.is_some() || self.to.is_some()
    }
}

//! Expense CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::expense::{format_expense_details, format_expense_list};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{ExpenseId, Money};
use crate::services::{CreateExpenseInput, ExpenseFilter, ExpenseService};
use crate::storage::Storage;

use super::{parse_date_arg, require_user, today, RangeArgs};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What the money was spent on
        name: String,
        /// Amount, e.g. "25.50"
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Receipt image path or URI
        #[arg(long)]
        image: Option<String>,
    },

    /// List expenses, newest first
    List {
        #[arg(short, long)]
        category: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
        /// Number of expenses to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show expense details
    Show {
        /// Expense ID or ID prefix
        expense: String,
    },

    /// Replace an expense; omitted fields keep their current value
    Edit {
        /// Expense ID or ID prefix
        expense: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Remove the receipt image reference
        #[arg(long, conflicts_with = "image")]
        clear_image: bool,
    },

    /// Delete expenses by ID, or every expense with a given name
    Delete {
        /// Expense IDs or ID prefixes
        #[arg(required_unless_present = "name")]
        expenses: Vec<String>,
        /// Delete all expenses with exactly this name
        #[arg(long, conflicts_with = "expenses")]
        name: Option<String>,
    },
}

fn parse_amount(s: &str) -> SpendwiseResult<Money> {
    Money::parse(s).map_err(|e| SpendwiseError::Validation(e.to_string()))
}

fn find_id(service: &ExpenseService<'_>, identifier: &str) -> SpendwiseResult<ExpenseId> {
    service
        .find(identifier)?
        .map(|e| e.id)
        .ok_or_else(|| SpendwiseError::expense_not_found(identifier))
}

pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> SpendwiseResult<()> {
    let user = require_user(storage, settings)?;
    let service = ExpenseService::new(storage, user.id);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            category,
            date,
            description,
            image,
        } => {
            let date = match date {
                Some(d) => parse_date_arg(&d)?,
                None => today(),
            };
            let expense = service.create(CreateExpenseInput {
                name,
                category,
                date,
                amount: parse_amount(&amount)?,
                description,
                image,
            })?;

            println!(
                "Recorded {} on {} under {}",
                expense.amount.format_with_symbol(currency),
                expense.date,
                expense.category
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List {
            category,
            range,
            limit,
        } => {
            let mut filter = ExpenseFilter::new().limit(limit);
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if range.is_set() {
                filter = filter.range(range.resolve(today())?);
            }
            println!("{}", format_expense_list(&service.list(&filter)?, currency));
        }

        ExpenseCommands::Show { expense } => {
            let found = service
                .find(&expense)?
                .ok_or_else(|| SpendwiseError::expense_not_found(&expense))?;
            print!("{}", format_expense_details(&found, currency));
        }

        ExpenseCommands::Edit {
            expense,
            name,
            amount,
            category,
            date,
            description,
            image,
            clear_image,
        } => {
            let current = service
                .find(&expense)?
                .ok_or_else(|| SpendwiseError::expense_not_found(&expense))?;

            let date = match date {
                Some(d) => parse_date_arg(&d)?,
                None => current.parsed_date().ok_or_else(|| {
                    SpendwiseError::Validation(format!(
                        "Stored date '{}' is invalid; pass --date to fix it",
                        current.date
                    ))
                })?,
            };
            let amount = match amount {
                Some(a) => parse_amount(&a)?,
                None => current.amount,
            };
            let image = if clear_image {
                None
            } else {
                image.or_else(|| current.image.clone())
            };

            let updated = service.update(
                current.id,
                CreateExpenseInput {
                    name: name.unwrap_or_else(|| current.name.clone()),
                    category: category.unwrap_or_else(|| current.category.clone()),
                    date,
                    amount,
                    description: description.or_else(|| Some(current.description.clone())),
                    image,
                },
            )?;

            println!("Updated expense {}", updated.id);
            print!("{}", format_expense_details(&updated, currency));
        }

        ExpenseCommands::Delete { expenses, name } => {
            let deleted = match name {
                Some(name) => service.delete_by_name(&name)?,
                None if expenses.len() == 1 => {
                    let id = find_id(&service, &expenses[0])?;
                    service.delete(id)?;
                    1
                }
                None => {
                    let ids = expenses
                        .iter()
                        .map(|e| find_id(&service, e))
                        .collect::<SpendwiseResult<Vec<_>>>()?;
                    service.delete_many(&ids)?
                }
            };
            println!("Deleted {} expense(s).", deleted);
        }
    }

    Ok(())
}

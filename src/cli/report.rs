//! Report CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Subcommand, ValueEnum};

use crate::aggregator::{classify_spend, compute_total_for_category, spend_percentage, SpendTier};
use crate::config::settings::Settings;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::reports::chart::MAX_CHART_WIDTH;
use crate::reports::{BarChart, ChartSink, PieChart, SpendingReport};
use crate::services::CategoryService;
use crate::storage::Storage;
use crate::store::ExpenseStore;

use super::{require_user, today, RangeArgs};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ChartKind {
    /// Percent of each category's maximum
    Bar,
    /// Each category's share of total spending
    Pie,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Spending per category against its limits
    Spending {
        #[command(flatten)]
        range: RangeArgs,
        /// Export to a CSV file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Show only the N categories with the most spending
        #[arg(long)]
        top: Option<usize>,
    },

    /// Draw spending as a chart
    Chart {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(short, long, value_enum, default_value_t = ChartKind::Bar)]
        kind: ChartKind,
        /// Bar width in characters
        #[arg(
            short,
            long,
            default_value_t = 30,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_CHART_WIDTH as u64)
        )]
        width: usize,
    },

    /// Total for one category over a date range
    Total {
        /// Category name, matched exactly
        #[arg(short, long)]
        category: String,
        #[command(flatten)]
        range: RangeArgs,
    },
}

pub async fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> SpendwiseResult<()> {
    let user = require_user(storage, settings)?;
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Spending { range, output, top } => {
            let range = range.resolve(today())?;
            let report = SpendingReport::generate(storage, user.id, range).await?;

            if let Some(path) = output {
                let file = File::create(&path).map_err(|e| {
                    SpendwiseError::Export(format!("Failed to create {}: {}", path.display(), e))
                })?;
                report.export_csv(BufWriter::new(file))?;
                println!("Report written to {}", path.display());
            } else if let Some(limit) = top {
                println!("Top {} categories, {}:", limit, report.range);
                for (i, row) in report.top_categories(limit).iter().enumerate() {
                    println!(
                        "  {}. {:<20} {:>12} {:>6.1}%",
                        i + 1,
                        row.spend.category,
                        row.spend.total.format_with_symbol(currency),
                        row.share
                    );
                }
            } else {
                print!("{}", report.format_terminal(currency));
            }
        }

        ReportCommands::Chart { range, kind, width } => {
            let range = range.resolve(today())?;
            let report = SpendingReport::generate(storage, user.id, range).await?;

            let rendered = match kind {
                ChartKind::Bar => {
                    let mut chart = BarChart::new(width);
                    report.chart_limits(&mut chart);
                    chart.render()
                }
                ChartKind::Pie => {
                    let mut chart = PieChart::new(width);
                    report.chart_totals(&mut chart);
                    chart.render()
                }
            };

            println!("Spending, {}", report.range);
            println!();
            print!("{}", rendered);
        }

        ReportCommands::Total { category, range } => {
            let range = range.resolve(today())?;
            let expenses = storage.list_expenses(user.id).await?;
            let total = compute_total_for_category(&expenses, &category, range.from, range.to);

            println!(
                "{} spent on {}, {}",
                total.format_with_symbol(currency),
                category,
                range
            );

            let defined = CategoryService::new(storage, user.id)
                .list()?
                .into_iter()
                .find(|c| c.name == category);
            match defined {
                Some(c) => {
                    match (
                        classify_spend(total, c.min_limit, c.max_limit),
                        spend_percentage(total, c.max_limit),
                    ) {
                        (Some(classification), Some(percentage)) => println!(
                            "  {} ({:.1}% of {} max, {})",
                            classification,
                            percentage,
                            c.max_limit,
                            SpendTier::from_percentage(percentage)
                        ),
                        _ => println!("  No maximum limit set"),
                    }
                }
                None => println!("  '{}' is not one of your categories", category),
            }
        }
    }

    Ok(())
}

//! Spending report
//!
//! Reads one owner's expenses and categories through the store traits, runs
//! them through the aggregator and keeps the result in a form that can be
//! printed, charted or exported.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;

use serde::Serialize;

use crate::aggregator::{self, CategorySpend, SpendTier};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{DateRange, Money, UserId};
use crate::store::{CategoryStore, ExpenseStore};

use super::chart::ChartSink;

/// One defined category in the report
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReportRow {
    #[serde(flatten)]
    pub spend: CategorySpend,
    /// Number of expenses counted into `spend.total`
    pub expense_count: usize,
    /// Percent of the report's grand total
    pub share: f64,
}

/// Spending per category over a date range
#[derive(Debug, Clone, Serialize)]
pub struct SpendingReport {
    pub range: DateRange,
    /// Defined categories in creation order, including those with no spending
    pub rows: Vec<CategoryReportRow>,
    /// Spending filed under names that match no defined category
    pub unmatched: BTreeMap<String, Money>,
    pub total: Money,
    /// Expenses left out because their date or amount is malformed
    pub skipped: usize,
}

impl SpendingReport {
    pub async fn generate<S>(store: &S, owner: UserId, range: DateRange) -> SpendwiseResult<Self>
    where
        S: ExpenseStore + CategoryStore + ?Sized,
    {
        let expenses = store.list_expenses(owner).await?;
        let categories = store.list_categories(owner).await?;

        let skipped = aggregator::count_malformed(&expenses);
        if skipped > 0 {
            log::warn!("skipped {} malformed expense records", skipped);
        }

        let spends = aggregator::summarize_categories(&expenses, &categories, range.from, range.to);
        let in_range =
            aggregator::compute_totals_by_category_in_range(&expenses, range.from, range.to);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for expense in expenses.iter().filter(|e| e.is_well_formed()) {
            if expense.parsed_date().is_some_and(|d| range.contains(d)) {
                *counts.entry(expense.category.as_str()).or_default() += 1;
            }
        }

        let defined: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        let unmatched: BTreeMap<String, Money> = in_range
            .iter()
            .filter(|(name, _)| !defined.contains(name.as_str()))
            .map(|(name, total)| (name.clone(), *total))
            .collect();
        if !unmatched.is_empty() {
            log::warn!(
                "{} category names on expenses match no defined category",
                unmatched.len()
            );
        }

        let total: Money = in_range.values().copied().sum();

        let rows = spends
            .into_iter()
            .map(|spend| {
                let expense_count = counts.get(spend.category.as_str()).copied().unwrap_or(0);
                let share = share_of(spend.total, total);
                CategoryReportRow {
                    spend,
                    expense_count,
                    share,
                }
            })
            .collect();

        Ok(Self {
            range,
            rows,
            unmatched,
            total,
            skipped,
        })
    }

    /// Rows with the largest totals first
    pub fn top_categories(&self, limit: usize) -> Vec<&CategoryReportRow> {
        let mut rows: Vec<_> = self.rows.iter().filter(|r| !r.spend.total.is_zero()).collect();
        rows.sort_by(|a, b| b.spend.total.cmp(&a.spend.total));
        rows.into_iter().take(limit).collect()
    }

    /// Rows whose category has a usable maximum
    pub fn limited_rows(&self) -> impl Iterator<Item = &CategoryReportRow> {
        self.rows.iter().filter(|r| r.spend.has_percentage())
    }

    /// Feed percent-of-maximum values into a chart; categories without a
    /// usable maximum are left out
    pub fn chart_limits(&self, sink: &mut dyn ChartSink) {
        for row in self.limited_rows() {
            if let Some(percentage) = row.spend.percentage {
                sink.push(&row.spend.category, percentage, row.spend.tier);
            }
        }
    }

    /// Feed spent amounts into a chart, including unmatched names
    pub fn chart_totals(&self, sink: &mut dyn ChartSink) {
        for row in self.rows.iter().filter(|r| !r.spend.total.is_zero()) {
            sink.push(&row.spend.category, row.spend.total.as_f64(), row.spend.tier);
        }
        for (name, total) in &self.unmatched {
            sink.push(name, total.as_f64(), None);
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Report: {}\n", self.range));
        output.push_str(&"=".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>12} {:>8} {:>8} {:>8} {:<8} {:>7}\n",
            "Category", "Spent", "Min", "Max", "% Max", "Status", "Share"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for row in &self.rows {
            let spend = &row.spend;
            let (percent, status) = match (spend.percentage, spend.tier) {
                (Some(pct), Some(tier)) => (format!("{:.1}%", pct), tier.to_string()),
                _ => ("-".to_string(), "-".to_string()),
            };
            output.push_str(&format!(
                "{:<20} {:>12} {:>8} {:>8} {:>8} {:<8} {:>6.1}%\n",
                spend.category,
                spend.total.format_with_symbol(currency),
                spend.min_limit,
                spend.max_limit,
                percent,
                status,
                row.share
            ));
        }

        if !self.unmatched.is_empty() {
            output.push_str("\nNot matching any category:\n");
            for (name, total) in &self.unmatched {
                output.push_str(&format!(
                    "  {:<18} {:>12}\n",
                    name,
                    total.format_with_symbol(currency)
                ));
            }
        }

        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>12}\n",
            "TOTAL",
            self.total.format_with_symbol(currency)
        ));

        let over: Vec<_> = self
            .rows
            .iter()
            .filter(|r| r.spend.tier == Some(SpendTier::Over))
            .map(|r| r.spend.category.as_str())
            .collect();
        if !over.is_empty() {
            output.push_str(&format!("\nOver limit: {}\n", over.join(", ")));
        }

        if self.skipped > 0 {
            output.push_str(&format!(
                "\n{} malformed expense records were skipped\n",
                self.skipped
            ));
        }

        output
    }

    /// Export one CSV record per category, unmatched name and a total line
    pub fn export_csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let from = self.range.from.to_string();
        let to = self.range.to.to_string();

        for row in &self.rows {
            csv_writer
                .serialize(CsvRecord {
                    from: &from,
                    to: &to,
                    category: &row.spend.category,
                    amount: row.spend.total.to_string(),
                    expenses: Some(row.expense_count),
                    min_limit: Some(row.spend.min_limit),
                    max_limit: Some(row.spend.max_limit),
                    percent_of_max: row.spend.percentage.map(|p| format!("{:.2}", p)),
                    tier: row.spend.tier.map(|t| t.as_str()),
                    share: format!("{:.2}", row.share),
                })
                .map_err(export_error)?;
        }

        for (name, total) in &self.unmatched {
            csv_writer
                .serialize(CsvRecord {
                    from: &from,
                    to: &to,
                    category: name,
                    amount: total.to_string(),
                    expenses: None,
                    min_limit: None,
                    max_limit: None,
                    percent_of_max: None,
                    tier: None,
                    share: format!("{:.2}", share_of(*total, self.total)),
                })
                .map_err(export_error)?;
        }

        csv_writer
            .serialize(CsvRecord {
                from: &from,
                to: &to,
                category: "TOTAL",
                amount: self.total.to_string(),
                expenses: None,
                min_limit: None,
                max_limit: None,
                percent_of_max: None,
                tier: None,
                share: if self.total.is_zero() { "0.00" } else { "100.00" }.to_string(),
            })
            .map_err(export_error)?;

        csv_writer
            .flush()
            .map_err(|e| SpendwiseError::Export(e.to_string()))
    }
}

#[derive(Serialize)]
struct CsvRecord<'a> {
    from: &'a str,
    to: &'a str,
    category: &'a str,
    amount: String,
    expenses: Option<usize>,
    min_limit: Option<i64>,
    max_limit: Option<i64>,
    percent_of_max: Option<String>,
    tier: Option<&'static str>,
    share: String,
}

fn export_error(e: csv::Error) -> SpendwiseError {
    SpendwiseError::Export(e.to_string())
}

fn share_of(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        part.cents() as f64 / whole.cents() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SpendClassification;
    use crate::models::{Category, Expense};
    use crate::reports::chart::BarChart;
    use crate::store::memory::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded_store(owner: UserId) -> MemoryStore {
        let store = MemoryStore::default();
        for category in [
            Category::new(owner, "Food", 250, 700),
            Category::new(owner, "Transport", 5, 10),
            Category::new(owner, "Entertainment", 0, 0),
        ] {
            store.insert_category(category).await.unwrap();
        }

        let expenses = [
            ("Groceries", "Food", date(2024, 5, 1), 5000),
            ("Lunch", "Food", date(2024, 5, 2), 2550),
            ("Bus", "Transport", date(2024, 5, 1), 1000),
            ("Gift", "Presents", date(2024, 5, 3), 1450),
            ("Old", "Food", date(2024, 4, 30), 9999),
        ];
        for (name, category, day, cents) in expenses {
            store
                .insert_expense(Expense::new(owner, name, category, day, Money::from_cents(cents)))
                .await
                .unwrap();
        }

        let mut broken = Expense::new(owner, "Broken", "Food", date(2024, 5, 5), Money::from_cents(100));
        broken.date = "05/05/2024".into();
        store.insert_expense(broken).await.unwrap();

        store
    }

    #[tokio::test]
    async fn test_generate_may_report() {
        let owner = UserId::new();
        let store = seeded_store(owner).await;

        let report = SpendingReport::generate(&store, owner, DateRange::month(2024, 5).unwrap())
            .await
            .unwrap();

        assert_eq!(report.rows.len(), 3);
        let food = &report.rows[0];
        assert_eq!(food.spend.total, Money::from_cents(7550));
        assert_eq!(food.expense_count, 2);
        assert_eq!(food.spend.classification, Some(SpendClassification::UnderMin));

        let transport = &report.rows[1];
        assert_eq!(transport.spend.tier, Some(SpendTier::Warning));

        let entertainment = &report.rows[2];
        assert!(entertainment.spend.total.is_zero());
        assert!(entertainment.spend.percentage.is_none());

        assert_eq!(report.unmatched.get("Presents"), Some(&Money::from_cents(1450)));
        assert_eq!(report.total, Money::from_cents(10000));
        assert_eq!(report.skipped, 1);
        assert!((food.share - 75.5).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_report_is_owner_scoped() {
        let owner = UserId::new();
        let store = seeded_store(owner).await;

        let report =
            SpendingReport::generate(&store, UserId::new(), DateRange::month(2024, 5).unwrap())
                .await
                .unwrap();
        assert!(report.rows.is_empty());
        assert!(report.total.is_zero());
    }

    #[tokio::test]
    async fn test_top_categories_and_limits_chart() {
        let owner = UserId::new();
        let store = seeded_store(owner).await;
        let report = SpendingReport::generate(&store, owner, DateRange::month(2024, 5).unwrap())
            .await
            .unwrap();

        let top = report.top_categories(5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].spend.category, "Food");

        let mut chart = BarChart::new(20);
        report.chart_limits(&mut chart);
        let rendered = chart.render();
        assert!(rendered.contains("Food"));
        assert!(rendered.contains("Transport"));
        assert!(!rendered.contains("Entertainment"));
    }

    #[tokio::test]
    async fn test_format_and_csv() {
        let owner = UserId::new();
        let store = seeded_store(owner).await;
        let report = SpendingReport::generate(&store, owner, DateRange::month(2024, 5).unwrap())
            .await
            .unwrap();

        let text = report.format_terminal("$");
        assert!(text.contains("2024-05-01 to 2024-05-31"));
        assert!(text.contains("$75.50"));
        assert!(text.contains("Presents"));
        assert!(text.contains("1 malformed expense records were skipped"));

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv_text = String::from_utf8(buffer).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "from,to,category,amount,expenses,min_limit,max_limit,percent_of_max,tier,share"
        );
        assert!(csv_text.contains("2024-05-01,2024-05-31,Food,75.50,2,250,700,10.79,safe,75.50"));
        assert!(csv_text.contains("TOTAL,100.00"));
    }
}

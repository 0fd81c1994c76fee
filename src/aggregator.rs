//! Expense aggregation and category-limit evaluation
//!
//! Pure functions over in-memory expense and category lists. Nothing here
//! touches storage, holds state or returns an error, so every function can be
//! called from any thread as often as needed.
//!
//! Malformed records (a stored date that does not parse, or a negative amount)
//! are skipped by every function in this module. Because the same rule applies
//! everywhere, the per-category total over a range covering every date always
//! equals that category's entry in [`compute_totals_by_category`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, Expense, Money};

/// Percent of the maximum at which spending moves from safe to warning
pub const WARNING_THRESHOLD_PERCENT: f64 = 70.0;

/// Percent of the maximum above which spending is over
pub const OVER_THRESHOLD_PERCENT: f64 = 100.0;

/// Where a total sits relative to a category's min/max limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendClassification {
    UnderMin,
    WithinRange,
    OverMax,
}

impl fmt::Display for SpendClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderMin => write!(f, "under min"),
            Self::WithinRange => write!(f, "within range"),
            Self::OverMax => write!(f, "over max"),
        }
    }
}

/// Three-way tier derived from the percentage of the maximum spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendTier {
    Safe,
    Warning,
    Over,
}

impl SpendTier {
    /// Below 70 is safe, 70 to 100 inclusive is warning, above 100 is over
    pub fn from_percentage(percent: f64) -> Self {
        if percent > OVER_THRESHOLD_PERCENT {
            Self::Over
        } else if percent >= WARNING_THRESHOLD_PERCENT {
            Self::Warning
        } else {
            Self::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Over => "over",
        }
    }
}

impl fmt::Display for SpendTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The date of an expense usable for aggregation, or `None` if malformed
fn usable_date(expense: &Expense) -> Option<NaiveDate> {
    if expense.amount.is_negative() {
        return None;
    }
    expense.parsed_date()
}

/// Sum of one category's expenses dated within `[from, to]`
///
/// The category match is exact and case-sensitive. An inverted range or an
/// unknown category yields zero.
pub fn compute_total_for_category(
    expenses: &[Expense],
    category_name: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Money {
    expenses
        .iter()
        .filter(|e| e.category == category_name)
        .filter(|e| usable_date(e).is_some_and(|d| d >= from && d <= to))
        .map(|e| e.amount)
        .sum()
}

/// Total per category name over all well-formed expenses
///
/// Categories without any expense are absent from the map.
pub fn compute_totals_by_category(expenses: &[Expense]) -> BTreeMap<String, Money> {
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();

    for expense in expenses.iter().filter(|e| usable_date(e).is_some()) {
        *totals.entry(expense.category.clone()).or_default() += expense.amount;
    }

    totals
}

/// Totals per category restricted to `[from, to]`
pub fn compute_totals_by_category_in_range(
    expenses: &[Expense],
    from: NaiveDate,
    to: NaiveDate,
) -> BTreeMap<String, Money> {
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();

    for expense in expenses {
        if usable_date(expense).is_some_and(|d| d >= from && d <= to) {
            *totals.entry(expense.category.clone()).or_default() += expense.amount;
        }
    }

    totals
}

/// Classify a total against whole-unit limits
///
/// Returns `None` when `max_limit <= 0`: the classification is undefined and
/// the category must be left out of percentage displays. The minimum is
/// checked first, so inverted legacy limits report `UnderMin`.
pub fn classify_spend(total: Money, min_limit: i64, max_limit: i64) -> Option<SpendClassification> {
    if max_limit <= 0 {
        return None;
    }

    let classification = if total < Money::from_units(min_limit) {
        SpendClassification::UnderMin
    } else if total > Money::from_units(max_limit) {
        SpendClassification::OverMax
    } else {
        SpendClassification::WithinRange
    };

    Some(classification)
}

/// `total / max_limit * 100`, or `None` when `max_limit <= 0`
pub fn spend_percentage(total: Money, max_limit: i64) -> Option<f64> {
    if max_limit <= 0 {
        return None;
    }
    Some(total.cents() as f64 / Money::from_units(max_limit).cents() as f64 * 100.0)
}

/// Tier for a total, or `None` when the maximum is not usable
pub fn spend_tier(total: Money, max_limit: i64) -> Option<SpendTier> {
    spend_percentage(total, max_limit).map(SpendTier::from_percentage)
}

/// Number of records every aggregation function skips
pub fn count_malformed(expenses: &[Expense]) -> usize {
    expenses.iter().filter(|e| usable_date(e).is_none()).count()
}

/// A category's spending over a range, evaluated against its limits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: Money,
    pub min_limit: i64,
    pub max_limit: i64,
    /// `None` when the category has no usable maximum
    pub classification: Option<SpendClassification>,
    /// Percent of `max_limit` spent; `None` when the category has no usable maximum
    pub percentage: Option<f64>,
    pub tier: Option<SpendTier>,
}

impl CategorySpend {
    /// Whether this row belongs in percentage-based displays
    pub fn has_percentage(&self) -> bool {
        self.percentage.is_some()
    }
}

/// Evaluate every category over `[from, to]`
///
/// Categories without matching expenses get a zero total. Output follows the
/// order of `categories`.
pub fn summarize_categories(
    expenses: &[Expense],
    categories: &[Category],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<CategorySpend> {
    let totals = compute_totals_by_category_in_range(expenses, from, to);

    categories
        .iter()
        .map(|category| {
            let total = totals.get(&category.name).copied().unwrap_or_default();
            let percentage = spend_percentage(total, category.max_limit);
            CategorySpend {
                category: category.name.clone(),
                total,
                min_limit: category.min_limit,
                max_limit: category.max_limit,
                classification: classify_spend(total, category.min_limit, category.max_limit),
                percentage,
                tier: percentage.map(SpendTier::from_percentage),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn expense(category: &str, cents: i64, day: &str) -> Expense {
        Expense::new(UserId::new(), "item", category, date(day), Money::from_cents(cents))
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("Food", 5000, "2024-05-01"),
            expense("Food", 2550, "2024-05-02"),
            expense("Transport", 1000, "2024-05-01"),
        ]
    }

    #[test]
    fn test_total_for_category_in_month() {
        let total = compute_total_for_category(
            &sample(),
            "Food",
            date("2024-05-01"),
            date("2024-05-31"),
        );
        assert_eq!(total, Money::from_cents(7550));
    }

    #[test]
    fn test_unknown_category_totals_zero() {
        let total = compute_total_for_category(
            &sample(),
            "Entertainment",
            date("2024-05-01"),
            date("2024-05-31"),
        );
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn test_category_match_is_case_sensitive() {
        let total = compute_total_for_category(
            &sample(),
            "food",
            date("2024-05-01"),
            date("2024-05-31"),
        );
        assert!(total.is_zero());
    }

    #[test]
    fn test_boundaries_inclusive_and_one_day_outside_excluded() {
        let expenses = vec![
            expense("Food", 100, "2024-04-30"),
            expense("Food", 200, "2024-05-01"),
            expense("Food", 400, "2024-05-31"),
            expense("Food", 800, "2024-06-01"),
        ];
        let total =
            compute_total_for_category(&expenses, "Food", date("2024-05-01"), date("2024-05-31"));
        assert_eq!(total, Money::from_cents(600));
    }

    #[test]
    fn test_dates_compared_as_dates_not_text() {
        // Unpadded text sorts after "2024-05-10" lexically but is May 9th.
        let mut unpadded = expense("Food", 300, "2024-05-09");
        unpadded.date = "2024-5-9".into();
        let expenses = vec![unpadded, expense("Food", 100, "2024-05-10")];

        let total =
            compute_total_for_category(&expenses, "Food", date("2024-05-01"), date("2024-05-09"));
        assert_eq!(total, Money::from_cents(300));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let mut bad_date = expense("Food", 9900, "2024-05-03");
        bad_date.date = "yesterday".into();
        let negative = expense("Food", -500, "2024-05-03");
        let mut expenses = sample();
        expenses.push(bad_date);
        expenses.push(negative);

        let total =
            compute_total_for_category(&expenses, "Food", date("2024-05-01"), date("2024-05-31"));
        assert_eq!(total, Money::from_cents(7550));
        assert_eq!(compute_totals_by_category(&expenses)["Food"], Money::from_cents(7550));
        assert_eq!(count_malformed(&expenses), 2);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let total = compute_total_for_category(
            &sample(),
            "Food",
            date("2024-05-31"),
            date("2024-05-01"),
        );
        assert!(total.is_zero());
    }

    #[test]
    fn test_totals_by_category() {
        let totals = compute_totals_by_category(&sample());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Food"], Money::from_cents(7550));
        assert_eq!(totals["Transport"], Money::from_cents(1000));
        assert!(!totals.contains_key("Entertainment"));
        assert!(compute_totals_by_category(&[]).is_empty());
    }

    #[test]
    fn test_spanning_range_matches_grouped_totals() {
        let mut expenses = sample();
        expenses.push(expense("Transport", 420, "2023-12-31"));
        expenses.push(expense("Rent", 70000, "2025-01-01"));

        let totals = compute_totals_by_category(&expenses);
        for (category, grouped) in &totals {
            let ranged = compute_total_for_category(
                &expenses,
                category,
                date("2023-12-31"),
                date("2025-01-01"),
            );
            assert_eq!(ranged, *grouped, "mismatch for {}", category);
        }
    }

    #[test]
    fn test_total_is_monotonic_as_range_widens() {
        let expenses = vec![
            expense("Food", 100, "2024-05-01"),
            expense("Food", 200, "2024-05-05"),
            expense("Food", 300, "2024-05-10"),
            expense("Food", 400, "2024-05-20"),
        ];
        let center = date("2024-05-08");
        let mut previous = Money::zero();
        for width in 0..20 {
            let from = center - chrono::Duration::days(width);
            let to = center + chrono::Duration::days(width);
            let total = compute_total_for_category(&expenses, "Food", from, to);
            assert!(total >= previous);
            previous = total;
        }
        assert_eq!(previous, Money::from_cents(1000));
    }

    #[test]
    fn test_idempotent() {
        let expenses = sample();
        let categories = vec![Category::new(UserId::new(), "Food", 250, 700)];
        let from = date("2024-05-01");
        let to = date("2024-05-31");

        assert_eq!(
            compute_totals_by_category(&expenses),
            compute_totals_by_category(&expenses)
        );
        assert_eq!(
            summarize_categories(&expenses, &categories, from, to),
            summarize_categories(&expenses, &categories, from, to)
        );
    }

    #[test]
    fn test_classify_within_range() {
        let total = Money::from_units(300);
        assert_eq!(
            classify_spend(total, 250, 700),
            Some(SpendClassification::WithinRange)
        );
        let pct = spend_percentage(total, 700).unwrap();
        assert!((pct - 42.857).abs() < 0.01);
        assert_eq!(spend_tier(total, 700), Some(SpendTier::Safe));
    }

    #[test]
    fn test_classify_over_max() {
        let total = Money::from_units(750);
        assert_eq!(classify_spend(total, 250, 700), Some(SpendClassification::OverMax));
        assert_eq!(spend_tier(total, 700), Some(SpendTier::Over));
    }

    #[test]
    fn test_classify_under_min_and_edges() {
        assert_eq!(
            classify_spend(Money::from_units(100), 250, 700),
            Some(SpendClassification::UnderMin)
        );
        assert_eq!(
            classify_spend(Money::from_units(250), 250, 700),
            Some(SpendClassification::WithinRange)
        );
        assert_eq!(
            classify_spend(Money::from_units(700), 250, 700),
            Some(SpendClassification::WithinRange)
        );
        assert_eq!(
            classify_spend(Money::from_cents(70001), 250, 700),
            Some(SpendClassification::OverMax)
        );
    }

    #[test]
    fn test_zero_max_is_undefined() {
        assert_eq!(classify_spend(Money::from_units(10), 0, 0), None);
        assert_eq!(spend_percentage(Money::from_units(10), 0), None);
        assert_eq!(spend_percentage(Money::from_units(10), -5), None);
        assert_eq!(spend_tier(Money::from_units(10), 0), None);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(SpendTier::from_percentage(0.0), SpendTier::Safe);
        assert_eq!(SpendTier::from_percentage(69.99), SpendTier::Safe);
        assert_eq!(SpendTier::from_percentage(70.0), SpendTier::Warning);
        assert_eq!(SpendTier::from_percentage(100.0), SpendTier::Warning);
        assert_eq!(SpendTier::from_percentage(100.01), SpendTier::Over);
        assert_eq!(SpendTier::Warning.to_string(), "warning");
    }

    #[test]
    fn test_summarize_categories() {
        let owner = UserId::new();
        let categories = vec![
            Category::new(owner, "Food", 250, 700),
            Category::new(owner, "Entertainment", 0, 0),
            Category::new(owner, "Transport", 5, 10),
        ];

        let rows = summarize_categories(
            &sample(),
            &categories,
            date("2024-05-01"),
            date("2024-05-31"),
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "Food");
        assert_eq!(rows[0].total, Money::from_cents(7550));
        assert_eq!(rows[0].classification, Some(SpendClassification::UnderMin));
        assert_eq!(rows[0].tier, Some(SpendTier::Safe));

        assert_eq!(rows[1].total, Money::zero());
        assert!(!rows[1].has_percentage());
        assert_eq!(rows[1].classification, None);

        assert_eq!(rows[2].total, Money::from_units(10));
        assert_eq!(rows[2].classification, Some(SpendClassification::WithinRange));
        assert_eq!(rows[2].tier, Some(SpendTier::Warning));
    }

    #[test]
    fn test_huge_stored_values_do_not_overflow() {
        let classification = classify_spend(Money::from_units(10), 0, i64::MAX / 10);
        assert_eq!(classification, Some(SpendClassification::WithinRange));
        assert!(spend_percentage(Money::from_units(10), i64::MAX / 10).is_some_and(|p| p < 1.0));

        let big = Money::parse("50000000000000000").unwrap();
        let expenses = vec![
            expense("Food", big.cents(), "2024-05-01"),
            expense("Food", big.cents(), "2024-05-02"),
        ];
        let total =
            compute_total_for_category(&expenses, "Food", date("2024-05-01"), date("2024-05-31"));
        assert_eq!(total, Money::from_cents(i64::MAX));
        assert_eq!(compute_totals_by_category(&expenses)["Food"], total);
        assert_eq!(classify_spend(total, 0, 700), Some(SpendClassification::OverMax));
    }
}

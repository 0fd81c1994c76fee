//! Inclusive calendar date ranges used by filters and reports

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed interval `[from, to]` of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Create a range; fails if `from` is after `to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if from > to {
            return Err(DateRangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// The whole calendar month containing the given year and month
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let from = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            from,
            to: next - Duration::days(1),
        })
    }

    /// The month containing `today`
    pub fn month_of(today: NaiveDate) -> Self {
        Self::month(today.year(), today.month()).unwrap_or(Self {
            from: today,
            to: today,
        })
    }

    /// Parse "YYYY-MM" into the matching month range
    pub fn parse_month(s: &str) -> Result<Self, DateRangeError> {
        let invalid = || DateRangeError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::month(year, month).ok_or_else(invalid)
    }

    /// Every representable date
    pub fn all_time() -> Self {
        Self {
            from: NaiveDate::MIN,
            to: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::all_time() {
            write!(f, "all time")
        } else {
            write!(f, "{} to {}", self.from, self.to)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    Inverted { from: NaiveDate, to: NaiveDate },
    InvalidMonth(String),
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted { from, to } => {
                write!(f, "Start date {} is after end date {}", from, to)
            }
            Self::InvalidMonth(s) => write!(f, "Invalid month '{}', expected YYYY-MM", s),
        }
    }
}

impl std::error::Error for DateRangeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let may = DateRange::month(2024, 5).unwrap();
        assert_eq!(may.from, date(2024, 5, 1));
        assert_eq!(may.to, date(2024, 5, 31));
        assert_eq!(may.days(), 31);

        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.to, date(2024, 2, 29));

        let dec = DateRange::month(2023, 12).unwrap();
        assert_eq!(dec.to, date(2023, 12, 31));

        assert!(DateRange::month(2024, 13).is_none());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2024, 5, 1), date(2024, 5, 31)).unwrap();
        assert!(range.contains(date(2024, 5, 1)));
        assert!(range.contains(date(2024, 5, 31)));
        assert!(!range.contains(date(2024, 4, 30)));
        assert!(!range.contains(date(2024, 6, 1)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            DateRange::new(date(2024, 6, 1), date(2024, 5, 1)),
            Err(DateRangeError::Inverted { .. })
        ));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(
            DateRange::parse_month("2024-05").unwrap(),
            DateRange::month(2024, 5).unwrap()
        );
        assert_eq!(
            DateRange::parse_month("2024-5").unwrap(),
            DateRange::month(2024, 5).unwrap()
        );
        assert!(DateRange::parse_month("2024").is_err());
        assert!(DateRange::parse_month("2024-00").is_err());
        assert!(DateRange::parse_month("May 2024").is_err());
    }

    #[test]
    fn test_month_of_and_display() {
        let range = DateRange::month_of(date(2024, 5, 17));
        assert_eq!(range.to_string(), "2024-05-01 to 2024-05-31");
        assert_eq!(DateRange::all_time().to_string(), "all time");
    }
}

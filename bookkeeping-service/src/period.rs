//! Month keys and the date windows derived from them.
//!
//! A month is identified by a `YYYY-MM` key. Quarters are not aligned to the
//! calendar: any month can start a three-month window.

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage and wire format for calendar days.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

/// A calendar month, always held as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=9999).contains(&year) {
            return Err(PeriodError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Month)
            .ok_or_else(|| PeriodError::InvalidMonth(format!("{year:04}-{month:02}")))
    }

    /// The month a calendar day belongs to.
    pub fn of(date: NaiveDate) -> Self {
        Month(date.with_day(1).unwrap_or(date))
    }

    /// Month of today's local date, the default selection for list views.
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn add_months(self, n: u32) -> Self {
        Month(self.0 + Months::new(n))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let (start, end) = month_date_range(*self);
        date >= start && date < end
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Month {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

/// The start month and the two months that follow it.
pub fn quarter_months(start: Month) -> [Month; 3] {
    [start, start.add_months(1), start.add_months(2)]
}

/// First day of the month (inclusive) and first day of the next month (exclusive).
pub fn month_date_range(month: Month) -> (NaiveDate, NaiveDate) {
    (month.first_day(), month.add_months(1).first_day())
}

/// First day of `start` (inclusive) and first day three months later (exclusive).
pub fn quarter_date_range(start: Month) -> (NaiveDate, NaiveDate) {
    (start.first_day(), start.add_months(3).first_day())
}

pub fn parse_date(s: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| PeriodError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn quarter_months_rolls_over_year_end() {
        let months = quarter_months(month("2024-11"));
        let keys: Vec<String> = months.iter().map(ToString::to_string).collect();
        assert_eq!(keys, ["2024-11", "2024-12", "2025-01"]);
    }

    #[test]
    fn month_range_end_is_first_of_next_month() {
        let (start, end) = month_date_range(month("2024-02"));
        assert_eq!(format_date(start), "2024-02-01");
        assert_eq!(format_date(end), "2024-03-01");
    }

    #[test]
    fn december_range_ends_in_january() {
        let (start, end) = month_date_range(month("2023-12"));
        assert_eq!(start, date("2023-12-01"));
        assert_eq!(end, date("2024-01-01"));
    }

    #[test]
    fn quarter_range_spans_three_months() {
        let (start, end) = quarter_date_range(month("2024-11"));
        assert_eq!(start, date("2024-11-01"));
        assert_eq!(end, date("2025-02-01"));
    }

    #[test]
    fn parses_and_displays_month_keys() {
        assert_eq!(month("2024-05").to_string(), "2024-05");
        assert_eq!(month("2024-05").year(), 2024);
        assert_eq!(month("2024-05").month(), 5);
    }

    #[test]
    fn rejects_malformed_month_keys() {
        for bad in ["2024-13", "2024-00", "24-05", "2024-5", "2024/05", "abcd-ef", "", "2024-05-01"] {
            assert!(bad.parse::<Month>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn month_of_date_and_contains() {
        let feb = Month::of(date("2024-02-29"));
        assert_eq!(feb, month("2024-02"));
        assert!(feb.contains(date("2024-02-01")));
        assert!(feb.contains(date("2024-02-29")));
        assert!(!feb.contains(date("2024-03-01")));
        assert!(!feb.contains(date("2024-01-31")));
    }

    #[test]
    fn month_serializes_as_key_string() {
        let json = serde_json::to_string(&month("2025-01")).unwrap();
        assert_eq!(json, "\"2025-01\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month("2025-01"));
        assert!(serde_json::from_str::<Month>("\"2025-1\"").is_err());
    }

    #[test]
    fn same_input_same_window() {
        let start = month("2024-07");
        assert_eq!(quarter_months(start), quarter_months(start));
        assert_eq!(quarter_date_range(start), quarter_date_range(start));
    }
}

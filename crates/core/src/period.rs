//! Reporting period resolution for the dashboard.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive date window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl DateRange {
    /// Whether `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Dashboard reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportingPeriod {
    /// Trailing 30 days.
    #[serde(rename = "last-30")]
    Last30Days,
    /// First of the current month through today.
    #[serde(rename = "this-month")]
    ThisMonth,
    /// Trailing six calendar months.
    #[serde(rename = "last-6-months")]
    Last6Months,
    /// January 1 through today.
    #[serde(rename = "this-year")]
    ThisYear,
}

impl ReportingPeriod {
    /// Parses a period string. Unknown values fall back to the trailing
    /// 30-day window.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "this-month" => Self::ThisMonth,
            "last-6-months" => Self::Last6Months,
            "this-year" => Self::ThisYear,
            _ => Self::Last30Days,
        }
    }

    /// The wire name of this period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last30Days => "last-30",
            Self::ThisMonth => "this-month",
            Self::Last6Months => "last-6-months",
            Self::ThisYear => "this-year",
        }
    }

    /// Resolves the period against `today` into an inclusive window ending
    /// at `today`.
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let start = match self {
            Self::Last30Days => today.checked_sub_days(Days::new(30)).unwrap_or(today),
            Self::ThisMonth => today.with_day(1).unwrap_or(today),
            Self::Last6Months => today.checked_sub_months(Months::new(6)).unwrap_or(today),
            Self::ThisYear => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
            }
        };
        DateRange { start, end: today }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_this_month_mid_march() {
        let range = ReportingPeriod::ThisMonth.resolve(d(2025, 3, 15));
        assert_eq!(range.start, d(2025, 3, 1));
        assert_eq!(range.end, d(2025, 3, 15));
    }

    #[test]
    fn test_last_30_days() {
        let range = ReportingPeriod::Last30Days.resolve(d(2025, 3, 15));
        assert_eq!(range.start, d(2025, 2, 13));
        assert_eq!(range.end, d(2025, 3, 15));
    }

    #[test]
    fn test_last_6_months() {
        let range = ReportingPeriod::Last6Months.resolve(d(2025, 3, 15));
        assert_eq!(range.start, d(2024, 9, 15));
        assert_eq!(range.end, d(2025, 3, 15));
    }

    #[test]
    fn test_this_year() {
        let range = ReportingPeriod::ThisYear.resolve(d(2025, 3, 15));
        assert_eq!(range.start, d(2025, 1, 1));
        assert_eq!(range.end, d(2025, 3, 15));
    }

    #[rstest]
    #[case("last-30", ReportingPeriod::Last30Days)]
    #[case("this-month", ReportingPeriod::ThisMonth)]
    #[case("last-6-months", ReportingPeriod::Last6Months)]
    #[case("this-year", ReportingPeriod::ThisYear)]
    #[case("garbage", ReportingPeriod::Last30Days)]
    #[case("", ReportingPeriod::Last30Days)]
    fn test_parse(#[case] input: &str, #[case] expected: ReportingPeriod) {
        assert_eq!(ReportingPeriod::parse(input), expected);
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = ReportingPeriod::ThisMonth.resolve(d(2025, 3, 15));
        assert!(range.contains(d(2025, 3, 1)));
        assert!(range.contains(d(2025, 3, 15)));
        assert!(!range.contains(d(2025, 2, 28)));
        assert!(!range.contains(d(2025, 3, 16)));
    }
}

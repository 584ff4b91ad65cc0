//! # Sales Report Filter
//!
//! Parses the optional `from` / `to` query bounds of the sales report.
//!
//! ## Accepted Bound Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input                          from (lower)            to (upper)      │
//! │  ─────────────────────────────  ──────────────────────  ─────────────── │
//! │  2024-01-31T10:00:00+07:00      03:00:00Z               03:00:00Z       │
//! │  2024-01-31T10:00:00.5          10:00:00.5Z             10:00:00.5Z     │
//! │  2024-01-31 10:00               10:00:00Z               10:00:00Z       │
//! │  2024-01-31                     00:00:00Z               00:00:00Z       │
//! │  garbage                        (no bound)              (no bound)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Both bounds are inclusive. Naive values are taken as UTC. A bare date is
//! midnight for either bound, so `to=2024-01-31` stops at 2024-01-31 00:00.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::SALES_REPORT_LIMIT;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Filter for the sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesFilter {
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of sales returned, newest first.
    pub limit: u32,
}

impl Default for SalesFilter {
    fn default() -> Self {
        SalesFilter {
            from: None,
            to: None,
            limit: SALES_REPORT_LIMIT,
        }
    }
}

impl SalesFilter {
    /// Builds a filter from raw query-string values. Unparseable bounds are
    /// dropped.
    ///
    /// ```rust
    /// use kasir_core::SalesFilter;
    ///
    /// let filter = SalesFilter::from_query(Some("2024-01-01"), Some("not a date"));
    /// assert!(filter.from.is_some());
    /// assert!(filter.to.is_none());
    /// assert_eq!(filter.limit, 200);
    /// ```
    pub fn from_query(from: Option<&str>, to: Option<&str>) -> Self {
        SalesFilter {
            from: from.and_then(parse_bound),
            to: to.and_then(parse_bound),
            ..SalesFilter::default()
        }
    }

    /// True when `at` falls inside the inclusive range.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

/// Parses one report bound. `None` for blank or unrecognized input.
pub fn parse_bound(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_date_only_bounds_are_midnight() {
        let filter = SalesFilter::from_query(Some("2024-01-01"), Some("2024-01-31"));

        assert_eq!(
            filter.from,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            filter.to,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap())
        );

        assert!(filter.contains(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()));
        assert!(!filter.contains(Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()));
        assert!(!filter.contains(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_rfc3339_offset_converted_to_utc() {
        let from = parse_bound("2024-01-31T10:00:00+07:00").unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 31, 3, 0, 0).unwrap());

        let to = parse_bound("2024-01-31T10:00:00Z").unwrap();
        assert_eq!(to, Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_datetimes_taken_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 8, 15, 0).unwrap();

        assert_eq!(parse_bound("2024-03-05T08:15:00"), Some(expected));
        assert_eq!(parse_bound("2024-03-05 08:15:00"), Some(expected));
        assert_eq!(parse_bound("2024-03-05T08:15"), Some(expected));
        assert_eq!(parse_bound("2024-03-05 08:15"), Some(expected));
        assert_eq!(
            parse_bound("2024-03-05T08:15:00.250"),
            Some(expected + Duration::milliseconds(250))
        );
    }

    #[test]
    fn test_unparseable_bounds_ignored() {
        let filter = SalesFilter::from_query(Some("yesterday"), Some(""));
        assert_eq!(filter, SalesFilter::default());

        assert_eq!(parse_bound("2024-13-01"), None);
    }

    #[test]
    fn test_default_filter_is_open() {
        let filter = SalesFilter::default();
        assert_eq!(filter.limit, SALES_REPORT_LIMIT);
        assert!(filter.contains(Utc::now()));
    }
}

//! Tolerant parsing of the textual dates stored on ledger rows.
//!
//! Rows written by different entry flows carry dates as `dd/mm/yyyy`,
//! `dd-mm-yyyy`, plain ISO dates or full ISO/RFC 3339 timestamps. Anything
//! else yields `None` so the caller can skip the row.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d"];

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a ledger date, returning `None` when no known layout matches.
///
/// Timestamps with an offset keep their local calendar date (the offset is
/// not applied), matching what the user typed when recording the entry.
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Some(date) = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(date.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Returns `(year, month)` for a raw ledger date.
pub fn ledger_year_month(raw: &str) -> Option<(i32, u32)> {
    parse_ledger_date(raw).map(|date| (date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_month_year_text() {
        assert_eq!(parse_ledger_date("15/06/2025"), Some(ymd(2025, 6, 15)));
        assert_eq!(parse_ledger_date("01-02-2024"), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn parses_iso_dates_and_timestamps() {
        assert_eq!(parse_ledger_date("2025-06-15"), Some(ymd(2025, 6, 15)));
        assert_eq!(
            parse_ledger_date("2025-06-15T10:30:00Z"),
            Some(ymd(2025, 6, 15))
        );
        assert_eq!(
            parse_ledger_date("2025-06-30T23:30:00-03:00"),
            Some(ymd(2025, 6, 30))
        );
        assert_eq!(
            parse_ledger_date("2025-06-15T10:30:00.123"),
            Some(ymd(2025, 6, 15))
        );
        assert_eq!(
            parse_ledger_date("2025-06-15 08:00:00"),
            Some(ymd(2025, 6, 15))
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_ledger_date(""), None);
        assert_eq!(parse_ledger_date("   "), None);
        assert_eq!(parse_ledger_date("yesterday"), None);
        assert_eq!(parse_ledger_date("31/02/2025"), None);
        assert_eq!(parse_ledger_date("15/13/2025"), None);
    }

    #[test]
    fn year_month_extraction() {
        assert_eq!(ledger_year_month("03/11/2024"), Some((2024, 11)));
        assert_eq!(ledger_year_month("nope"), None);
    }
}

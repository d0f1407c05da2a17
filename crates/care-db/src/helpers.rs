//! Cell parsing helpers.
//!
//! Every partition stores rows as ordered string cells. These helpers isolate
//! the conversion between cells and typed values, including the several
//! datetime spellings older clients wrote.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::DatabaseError;
use crate::storage::Row;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a datetime cell.
///
/// Accepts RFC 3339 (`"2026-02-09T14:30:00+00:00"`), `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`), slash-separated variants, and bare dates
/// (midnight UTC).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches none of the formats.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
        }
    }
    Err(DatabaseError::Query(format!(
        "Failed to parse datetime '{s}'"
    )))
}

/// Parse a datetime cell, mapping blank or malformed cells to `None`.
#[must_use]
pub fn parse_cell_datetime(s: &str) -> Option<DateTime<Utc>> {
    if s.trim().is_empty() {
        return None;
    }
    parse_datetime(s).ok()
}

/// Canonical cell spelling for a timestamp. Round-trips through [`parse_datetime`].
#[must_use]
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Optional timestamp cell; `None` is written as an empty cell.
#[must_use]
pub fn format_optional_datetime(dt: Option<DateTime<Utc>>) -> String {
    dt.map(format_datetime).unwrap_or_default()
}

/// Read a cell by index. Missing cells read as empty.
#[must_use]
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or("", String::as_str)
}

/// Read a cell, mapping blank to `None`.
#[must_use]
pub fn opt_cell(row: &[String], idx: usize) -> Option<String> {
    let value = cell(row, idx).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Pad a row with empty cells up to `width`.
///
/// Rows written before a column was appended to the layout are shorter.
pub fn pad_row(row: &mut Row, width: usize) {
    if row.len() < width {
        row.resize(width, String::new());
    }
}

/// Extract an optional JSON value from a cell.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: &str) -> Result<Option<serde_json::Value>, DatabaseError> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(s)
        .map(Some)
        .map_err(|e| DatabaseError::Query(format!("Invalid JSON in cell: {e}")))
}

/// Convert a row position for binding as an SQL integer.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value overflows `i64`.
pub fn to_sql_int(value: usize) -> Result<i64, DatabaseError> {
    i64::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("row position {value} out of range")))
}

/// Convert an SQL integer read back from the database.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value is negative.
pub fn from_sql_int(value: i64) -> Result<usize, DatabaseError> {
    usize::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("negative row count {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2026-02-09T14:30:00+00:00")]
    #[case("2026-02-09T23:30:00+09:00")]
    #[case("2026-02-09 14:30:00")]
    #[case("2026/02/09 14:30:00")]
    #[case("2026/02/09 14:30")]
    #[case("2026-02-09T14:30")]
    fn parses_known_datetime_spellings(#[case] input: &str) {
        let expected = Utc.with_ymd_and_hms(2026, 2, 9, 14, 30, 0).unwrap();
        assert_eq!(parse_datetime(input).unwrap(), expected);
    }

    #[rstest]
    #[case("2026-02-09")]
    #[case("2026/02/09")]
    fn bare_dates_are_midnight(#[case] input: &str) {
        let expected = Utc.with_ymd_and_hms(2026, 2, 9, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime(input).unwrap(), expected);
    }

    #[test]
    fn malformed_cells_are_none() {
        assert!(parse_datetime("yesterday").is_err());
        assert_eq!(parse_cell_datetime(""), None);
        assert_eq!(parse_cell_datetime("2026-13-40"), None);
    }

    #[test]
    fn formatted_timestamps_round_trip() {
        let now = Utc::now();
        assert_eq!(parse_datetime(&format_datetime(now)).unwrap(), now);
        assert_eq!(format_optional_datetime(None), "");
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let mut row = vec!["a".to_string()];
        pad_row(&mut row, 3);
        assert_eq!(row, vec!["a", "", ""]);
        assert_eq!(cell(&row, 7), "");
        assert_eq!(opt_cell(&row, 1), None);
    }

    #[test]
    fn json_cells() {
        assert_eq!(parse_optional_json("").unwrap(), None);
        assert_eq!(
            parse_optional_json(r#"{"moved":3}"#).unwrap(),
            Some(serde_json::json!({"moved": 3}))
        );
        assert!(parse_optional_json("{oops").is_err());
    }
}

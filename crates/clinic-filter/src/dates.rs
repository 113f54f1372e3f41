//! Calendar-date extraction for date-range filters.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Extracts the calendar date of a cell value.
///
/// Accepts ISO dates, RFC 3339 timestamps (date taken in their own offset),
/// naive date-times, `DD/MM/YYYY`, and integer epoch milliseconds.
pub fn value_to_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(text) => parse_date(text),
        Value::Number(number) => {
            let millis = number.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|stamp| stamp.date_naive())
        }
        _ => None,
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(stamp.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

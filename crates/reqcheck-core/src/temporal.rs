//! # Temporal Coercion: Text and Epoch Values to UTC Instants
//!
//! Defines [`parse_date`], the single decision point for whether a request
//! field denotes a calendar date/time.
//!
//! ## Validity
//!
//! A value is a valid date when it resolves to an instant whose epoch
//! millisecond count lies within `±8.64e15` and that `chrono` can represent
//! (years up to ±262 000). Validity is a numeric check on the parsed
//! timestamp. No rendered text is ever compared against a sentinel.
//!
//! ## Accepted Inputs
//!
//! - Numbers, and text that parses as a number: epoch milliseconds.
//! - RFC 3339 (`2026-01-15T12:00:00Z`, any offset).
//! - RFC 2822 (`Thu, 15 Jan 2026 12:00:00 +0000`).
//! - `Date#toString` output (`Thu Jan 15 2026 12:00:00 GMT+0000 (UTC)`).
//! - Naive `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.f]]`, `YYYY-MM-DD HH:MM:SS[.f]`,
//!   read as UTC.
//!
//! All results are normalized to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::value::FieldValue;

/// Largest magnitude of epoch milliseconds accepted as a date.
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Resolve a field value to a UTC instant.
///
/// Returns `None` when the value does not denote a valid point in time.
/// `Date` values are returned unchanged, so date coercion is idempotent.
pub fn parse_date(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Date(d) => Some(*d),
        FieldValue::Integer(ms) => from_epoch_millis(*ms),
        FieldValue::Number(ms) => from_epoch_millis_f64(*ms),
        FieldValue::Text(s) => parse_date_text(s),
        FieldValue::Boolean(_) | FieldValue::Json(_) => None,
    }
}

/// Create an instant from Unix epoch milliseconds.
pub fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    if ms.checked_abs()? > MAX_EPOCH_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(ms)
}

fn from_epoch_millis_f64(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > MAX_EPOCH_MILLIS as f64 {
        return None;
    }
    from_epoch_millis(ms.trunc() as i64)
}

/// Parse a textual date. See the module docs for accepted forms.
pub fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ms) = s.parse::<f64>() {
        return from_epoch_millis_f64(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return within_range(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return within_range(dt.with_timezone(&Utc));
    }

    // `Date#toString` appends a parenthesized zone name that carries no
    // information beyond the numeric offset.
    let without_zone_name = s.split(" (").next().unwrap_or(s);
    if let Ok(dt) = DateTime::parse_from_str(without_zone_name, "%a %b %d %Y %H:%M:%S GMT%z") {
        return within_range(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return within_range(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| within_range(naive.and_utc()))
}

fn within_range(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if dt.timestamp_millis().abs() > MAX_EPOCH_MILLIS {
        None
    } else {
        Some(dt)
    }
}

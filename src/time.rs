// Timestamp resolution for the date-bearing header setters

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{CachingError, Result};

/// Naive datetime formats accepted by [`to_timestamp`] after the RFC 7231 and
/// RFC 3339 parsers have passed, all interpreted as UTC. The IMF-fixdate entry
/// catches dates outside `httpdate`'s 1970–9999 year range.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%a, %d %b %Y %H:%M:%S GMT",
];

const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A point in time accepted by the date-bearing setters: an absolute Unix
/// timestamp, a date string, or a structured instant.
#[derive(Debug, Clone)]
pub enum DateInput {
    Timestamp(i64),
    Text(String),
    Instant(SystemTime),
}

impl From<i64> for DateInput {
    fn from(timestamp: i64) -> Self {
        Self::Timestamp(timestamp)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<SystemTime> for DateInput {
    fn from(instant: SystemTime) -> Self {
        Self::Instant(instant)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Timestamp(instant.timestamp())
    }
}

/// Resolves a date input to a Unix timestamp in seconds.
///
/// Integer inputs are already timestamps and pass through unchanged. Strings
/// are trimmed and parsed permissively: RFC 7231 HTTP dates first, then
/// RFC 3339 / ISO 8601, then a handful of naive datetime shapes interpreted
/// as UTC.
///
/// Returns [`CachingError::EmptyDateInput`] for blank strings and
/// [`CachingError::MalformedDate`] for strings no parser accepts.
pub fn to_timestamp(input: impl Into<DateInput>) -> Result<i64> {
    match input.into() {
        DateInput::Timestamp(timestamp) => Ok(timestamp),
        DateInput::Instant(instant) => Ok(system_time_to_unix(instant)),
        DateInput::Text(value) => parse_date_string(&value),
    }
}

fn parse_date_string(value: &str) -> Result<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CachingError::EmptyDateInput);
    }
    if let Ok(instant) = httpdate::parse_http_date(value) {
        return Ok(system_time_to_unix(instant));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.timestamp());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(date.and_utc().timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, NAIVE_DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().timestamp());
        }
    }
    Err(CachingError::MalformedDate(value.to_string()))
}

fn system_time_to_unix(instant: SystemTime) -> i64 {
    match instant.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        // pre-epoch instants sit on the negative side of the axis
        Err(err) => -(err.duration().as_secs() as i64),
    }
}

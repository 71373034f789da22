// HTTP header collection utilities shared by the builders and matchers

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::time::to_timestamp;

/// IMF-fixdate (RFC 7231) in GMT, the canonical rendering for every HTTP date
/// header emitted or validated by this crate.
const IMF_FIXDATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A raw header value as handed over by an HTTP layer: either a single string
/// or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// The first usable value: the string itself, or the first list element.
    /// An empty list has no value.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multi(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

impl From<&[&str]> for HeaderValue {
    fn from(values: &[&str]) -> Self {
        Self::Multi(values.iter().map(|value| value.to_string()).collect())
    }
}

/// An inbound header collection keyed by header name.
pub type RawHeaders = HashMap<String, HeaderValue>;

/// Looks up a header by name, case-insensitively, and returns its first value.
pub fn first_header_value<'a>(headers: &'a RawHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.first())
}

/// Rewrites every header name to lowercase. Later entries win when two names
/// collide after lowercasing.
pub fn normalize_headers(headers: RawHeaders) -> RawHeaders {
    headers
        .into_iter()
        .map(|(name, value)| (name.to_lowercase(), value))
        .collect()
}

/// Overlays `replacements` onto `headers`, lowercasing every name on both
/// sides first.
pub fn replace_headers(headers: RawHeaders, replacements: RawHeaders) -> RawHeaders {
    let mut merged = normalize_headers(headers);
    merged.extend(normalize_headers(replacements));
    merged
}

/// Renders a Unix timestamp as an IMF-fixdate string in GMT, e.g.
/// `Tue, 19 Jan 2038 03:14:07 GMT`.
pub fn to_date_string(timestamp: i64) -> String {
    let date = DateTime::from_timestamp(timestamp, 0).unwrap_or_else(|| {
        // clamp timestamps beyond chrono's ±262143-year range
        if timestamp < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        }
    });
    date.format(IMF_FIXDATE_FORMAT).to_string()
}

/// True iff `value` parses as a date and re-renders to the identical string.
///
/// The round trip admits only canonical IMF-fixdate strings and recomputes the
/// weekday from the date, so a mislabeled weekday fails the comparison.
pub fn is_valid_date_string(value: &str) -> bool {
    match to_timestamp(value) {
        Ok(timestamp) => to_date_string(timestamp) == value,
        Err(_) => false,
    }
}

//! Conditional request evaluation.
//!
//! [`ETagMatcher`] compares a current entity tag against `If-Match` /
//! `If-None-Match` request headers, and [`ModifiedMatcher`] compares a base
//! timestamp against `If-Modified-Since` / `If-Unmodified-Since`. Both ingest
//! a raw header map (normalized to lowercase names) or individual header
//! values, and return plain result structs the caller turns into 304 / 412
//! decisions.
//!
//! # Examples
//!
//! ```
//! use armature_http_caching::ETagMatcher;
//!
//! let mut matcher = ETagMatcher::new();
//! matcher.if_none_match_header("\"abc123\"");
//!
//! let result = matcher.matches(Some("\"abc123\""));
//! assert!(result.matches_if_none_match());
//! ```
//!
//! ```
//! use armature_http_caching::ModifiedMatcher;
//!
//! let mut matcher = ModifiedMatcher::new();
//! matcher.if_modified_since_header("Tue, 12 Oct 2021 08:00:00 GMT");
//!
//! // entity unchanged since the header date: not modified
//! let result = matcher.matches(1634025600).unwrap();
//! assert!(!result.is_modified_since());
//! ```

use tracing::debug;

use crate::error::{CachingError, Result};
use crate::headers::{
    HeaderValue, RawHeaders, first_header_value, is_valid_date_string, normalize_headers,
};
use crate::time::{DateInput, to_timestamp};

const IF_MATCH_HEADER: &str = "if-match";
const IF_NONE_MATCH_HEADER: &str = "if-none-match";
const IF_MODIFIED_SINCE_HEADER: &str = "if-modified-since";
const IF_UNMODIFIED_SINCE_HEADER: &str = "if-unmodified-since";

/// Evaluates `If-Match` and `If-None-Match` against the current entity tag.
///
/// Comparison is exact string equality on the raw header values. Weak
/// comparison (ignoring `W/` prefixes) and the `*` wildcard are not applied;
/// callers that need them must normalize beforehand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ETagMatcher {
    headers: RawHeaders,
}

impl ETagMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ingested headers. Names are normalized to lowercase,
    /// duplicates differing only in case collapse to the last one.
    pub fn headers(&mut self, headers: RawHeaders) -> &mut Self {
        self.headers = normalize_headers(headers);
        self
    }

    /// New instance with the given headers.
    pub fn with_headers(&self, headers: RawHeaders) -> Self {
        let mut next = self.clone();
        next.headers(headers);
        next
    }

    /// Drop all ingested headers.
    pub fn reset_headers(&mut self) -> &mut Self {
        self.headers = RawHeaders::new();
        self
    }

    /// New instance without any headers.
    pub fn without_headers(&self) -> Self {
        let mut next = self.clone();
        next.reset_headers();
        next
    }

    /// Set the `If-Match` header value directly.
    pub fn if_match_header(&mut self, value: impl Into<HeaderValue>) -> &mut Self {
        self.headers.insert(IF_MATCH_HEADER.to_string(), value.into());
        self
    }

    /// New instance with an `If-Match` header.
    pub fn with_if_match_header(&self, value: impl Into<HeaderValue>) -> Self {
        let mut next = self.clone();
        next.if_match_header(value);
        next
    }

    /// Set the `If-None-Match` header value directly.
    pub fn if_none_match_header(&mut self, value: impl Into<HeaderValue>) -> &mut Self {
        self.headers
            .insert(IF_NONE_MATCH_HEADER.to_string(), value.into());
        self
    }

    /// New instance with an `If-None-Match` header.
    pub fn with_if_none_match_header(&self, value: impl Into<HeaderValue>) -> Self {
        let mut next = self.clone();
        next.if_none_match_header(value);
        next
    }

    /// First `If-Match` value, if present.
    pub fn get_if_match_header(&self) -> Option<&str> {
        first_header_value(&self.headers, IF_MATCH_HEADER)
    }

    pub fn has_if_match_header(&self) -> bool {
        self.get_if_match_header().is_some()
    }

    /// First `If-None-Match` value, if present.
    pub fn get_if_none_match_header(&self) -> Option<&str> {
        first_header_value(&self.headers, IF_NONE_MATCH_HEADER)
    }

    pub fn has_if_none_match_header(&self) -> bool {
        self.get_if_none_match_header().is_some()
    }

    /// Compare the current entity tag against both conditional headers.
    /// `None` means the entity has no tag and matches nothing.
    pub fn matches(&self, etag: Option<&str>) -> ETagMatchResult {
        self.matches_any(etag)
    }

    /// Compare a set of candidate tags; a header matches when any candidate
    /// equals it exactly.
    pub fn matches_any<I, S>(&self, etags: I) -> ETagMatchResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let if_match = self.get_if_match_header();
        let if_none_match = self.get_if_none_match_header();
        let mut result = ETagMatchResult {
            if_match: false,
            if_none_match: false,
        };
        for etag in etags {
            let candidate = Some(etag.as_ref());
            if if_match == candidate {
                result.if_match = true;
            }
            if if_none_match == candidate {
                result.if_none_match = true;
            }
        }
        result
    }
}

/// Outcome of an [`ETagMatcher`] comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ETagMatchResult {
    if_match: bool,
    if_none_match: bool,
}

impl ETagMatchResult {
    /// True when the entity tag equals the `If-Match` header.
    pub fn matches_if_match(&self) -> bool {
        self.if_match
    }

    /// True when the entity tag differs from (or lacks) the `If-Match`
    /// header. The usual 412 trigger when the header was present.
    pub fn not_matches_if_match(&self) -> bool {
        !self.if_match
    }

    /// True when the entity tag equals the `If-None-Match` header. The usual
    /// 304 trigger.
    pub fn matches_if_none_match(&self) -> bool {
        self.if_none_match
    }

    /// True when the entity tag differs from (or lacks) the `If-None-Match`
    /// header.
    pub fn not_matches_if_none_match(&self) -> bool {
        !self.if_none_match
    }
}

/// Evaluates `If-Modified-Since` and `If-Unmodified-Since` against a base
/// timestamp, typically the entity's last modification time.
///
/// Header values must round-trip through IMF-fixdate rendering to count as
/// valid; anything else surfaces as
/// [`CachingError::InvalidConditionalHeader`] when the timestamp is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifiedMatcher {
    headers: RawHeaders,
}

impl ModifiedMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ingested headers. Names are normalized to lowercase,
    /// duplicates differing only in case collapse to the last one.
    pub fn headers(&mut self, headers: RawHeaders) -> &mut Self {
        self.headers = normalize_headers(headers);
        self
    }

    /// New instance with the given headers.
    pub fn with_headers(&self, headers: RawHeaders) -> Self {
        let mut next = self.clone();
        next.headers(headers);
        next
    }

    /// Drop all ingested headers.
    pub fn reset_headers(&mut self) -> &mut Self {
        self.headers = RawHeaders::new();
        self
    }

    /// New instance without any headers.
    pub fn without_headers(&self) -> Self {
        let mut next = self.clone();
        next.reset_headers();
        next
    }

    /// Set the `If-Modified-Since` header value directly.
    pub fn if_modified_since_header(&mut self, value: impl Into<HeaderValue>) -> &mut Self {
        self.headers
            .insert(IF_MODIFIED_SINCE_HEADER.to_string(), value.into());
        self
    }

    /// New instance with an `If-Modified-Since` header.
    pub fn with_if_modified_since_header(&self, value: impl Into<HeaderValue>) -> Self {
        let mut next = self.clone();
        next.if_modified_since_header(value);
        next
    }

    /// Set the `If-Unmodified-Since` header value directly.
    pub fn if_unmodified_since_header(&mut self, value: impl Into<HeaderValue>) -> &mut Self {
        self.headers
            .insert(IF_UNMODIFIED_SINCE_HEADER.to_string(), value.into());
        self
    }

    /// New instance with an `If-Unmodified-Since` header.
    pub fn with_if_unmodified_since_header(&self, value: impl Into<HeaderValue>) -> Self {
        let mut next = self.clone();
        next.if_unmodified_since_header(value);
        next
    }

    /// First `If-Modified-Since` value, if present.
    pub fn get_if_modified_since_header(&self) -> Option<&str> {
        first_header_value(&self.headers, IF_MODIFIED_SINCE_HEADER)
    }

    pub fn has_if_modified_since_header(&self) -> bool {
        self.get_if_modified_since_header().is_some()
    }

    /// First `If-Unmodified-Since` value, if present.
    pub fn get_if_unmodified_since_header(&self) -> Option<&str> {
        first_header_value(&self.headers, IF_UNMODIFIED_SINCE_HEADER)
    }

    pub fn has_if_unmodified_since_header(&self) -> bool {
        self.get_if_unmodified_since_header().is_some()
    }

    /// True when `If-Modified-Since` is present and parses as a valid HTTP
    /// date. Absent counts as invalid.
    pub fn is_valid_if_modified_since_header(&self) -> bool {
        self.get_if_modified_since_header()
            .is_some_and(is_valid_date_string)
    }

    pub fn is_invalid_if_modified_since_header(&self) -> bool {
        !self.is_valid_if_modified_since_header()
    }

    /// True when `If-Unmodified-Since` is present and parses as a valid HTTP
    /// date. Absent counts as invalid.
    pub fn is_valid_if_unmodified_since_header(&self) -> bool {
        self.get_if_unmodified_since_header()
            .is_some_and(is_valid_date_string)
    }

    pub fn is_invalid_if_unmodified_since_header(&self) -> bool {
        !self.is_valid_if_unmodified_since_header()
    }

    /// The `If-Modified-Since` header as a Unix timestamp. `Ok(None)` when
    /// the header is absent; an error when it is present but malformed.
    pub fn get_if_modified_since_timestamp(&self) -> Result<Option<i64>> {
        Self::header_timestamp(self.get_if_modified_since_header(), "If-Modified-Since")
    }

    /// The `If-Unmodified-Since` header as a Unix timestamp. `Ok(None)` when
    /// the header is absent; an error when it is present but malformed.
    pub fn get_if_unmodified_since_timestamp(&self) -> Result<Option<i64>> {
        Self::header_timestamp(self.get_if_unmodified_since_header(), "If-Unmodified-Since")
    }

    fn header_timestamp(value: Option<&str>, name: &'static str) -> Result<Option<i64>> {
        let Some(value) = value else {
            return Ok(None);
        };
        if !is_valid_date_string(value) {
            debug!(header = name, "conditional header failed date validation");
            return Err(CachingError::InvalidConditionalHeader(name));
        }
        // the string was just validated, so a parse failure here means the
        // validator and the parser disagree
        let timestamp = to_timestamp(value).map_err(|_| {
            CachingError::InternalConsistency("validated date string failed timestamp conversion")
        })?;
        Ok(Some(timestamp))
    }

    /// Compare a base timestamp against both conditional headers. Fails when
    /// either header is present but not a valid HTTP date, or when the base
    /// input itself cannot be resolved.
    pub fn matches(&self, base: impl Into<DateInput>) -> Result<ModifiedMatchResult> {
        let base = to_timestamp(base)?;
        Ok(ModifiedMatchResult {
            base,
            if_modified_since: self.get_if_modified_since_timestamp()?,
            if_unmodified_since: self.get_if_unmodified_since_timestamp()?,
        })
    }
}

/// Outcome of a [`ModifiedMatcher`] comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifiedMatchResult {
    base: i64,
    if_modified_since: Option<i64>,
    if_unmodified_since: Option<i64>,
}

impl ModifiedMatchResult {
    /// True when the base timestamp is strictly newer than either conditional
    /// header. With both headers absent this is false.
    pub fn is_modified_since(&self) -> bool {
        self.if_modified_since.is_some_and(|since| self.base > since)
            || self.if_unmodified_since.is_some_and(|since| self.base > since)
    }

    /// True when the base timestamp equals `If-Modified-Since` exactly.
    pub fn matches_modified_at(&self) -> bool {
        self.if_modified_since
            .is_some_and(|since| self.base == since)
    }

    /// True when `If-Unmodified-Since` is present and the base timestamp is
    /// at or before it. The precondition-holds case for 412 checks.
    pub fn is_unmodified_since(&self) -> bool {
        self.if_unmodified_since
            .is_some_and(|since| self.base <= since)
    }
}

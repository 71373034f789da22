//! ETag response header construction.
//!
//! [`ETagHeaderBuilder`] holds an opaque validator token plus the weak/strong
//! flag and renders the quoted wire form (`"token"` or `W/"token"`). Blank
//! tokens collapse to the unset state instead of producing an empty tag.
//!
//! # Examples
//!
//! ```
//! use armature_http_caching::{ETagHeaderBuilder, HeaderBuilder};
//!
//! let etag = ETagHeaderBuilder::new().with_etag("33a64df5", false);
//! assert_eq!(etag.get_etag().as_deref(), Some("\"33a64df5\""));
//!
//! let weak = etag.with_weak(true);
//! assert_eq!(weak.to_headers()["etag"], "W/\"33a64df5\"");
//! ```
//!
//! A tag can also be derived from arbitrary data; the computation must come
//! back with a string or null:
//!
//! ```
//! use armature_http_caching::ETagHeaderBuilder;
//! use serde_json::Value;
//!
//! let etag = ETagHeaderBuilder::new()
//!     .with_computed_etag("report-v2", |name| Value::String(format!("{}.html", name)), false)
//!     .unwrap();
//! assert_eq!(etag.get_etag().as_deref(), Some("\"report-v2.html\""));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::HeaderBuilder;
use crate::error::{CachingError, Result};

pub const ETAG_HEADER: &str = "etag";

/// Builder for the `ETag` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ETagHeaderBuilder {
    etag: Option<String>,
    weak: bool,
}

impl ETagHeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity tag. The token is trimmed; a blank token unsets the tag
    /// and forces the strong form, ignoring `weak`.
    pub fn etag(&mut self, token: impl AsRef<str>, weak: bool) -> &mut Self {
        let token = token.as_ref().trim();
        if token.is_empty() {
            self.etag = None;
            self.weak = false;
        } else {
            self.etag = Some(token.to_string());
            self.weak = weak;
        }
        self
    }

    /// Derive the entity tag from `data`. The computation must return a JSON
    /// string (used as the token, blank collapsing to unset) or null (unsets
    /// the tag); any other value is rejected with
    /// [`CachingError::InvalidComputedEtag`].
    pub fn computed_etag<T, F>(&mut self, data: T, func: F, weak: bool) -> Result<&mut Self>
    where
        F: FnOnce(T) -> Value,
    {
        match func(data) {
            Value::String(token) => Ok(self.etag(token, weak)),
            Value::Null => Ok(self.etag("", weak)),
            other => Err(CachingError::InvalidComputedEtag(json_type_name(&other))),
        }
    }

    /// Mark the tag weak (`W/"token"`) or strong.
    pub fn weak(&mut self, weak: bool) -> &mut Self {
        self.weak = weak;
        self
    }

    /// Clear the token, leaving the weak flag untouched.
    pub fn reset_etag(&mut self) -> &mut Self {
        self.etag = None;
        self
    }

    /// Back to the strong form.
    pub fn reset_weak(&mut self) -> &mut Self {
        self.weak = false;
        self
    }

    /// New instance with the given entity tag.
    pub fn with_etag(&self, token: impl AsRef<str>, weak: bool) -> Self {
        let mut next = self.clone();
        next.etag(token, weak);
        next
    }

    /// New instance with a tag derived from `data`.
    pub fn with_computed_etag<T, F>(&self, data: T, func: F, weak: bool) -> Result<Self>
    where
        F: FnOnce(T) -> Value,
    {
        let mut next = self.clone();
        next.computed_etag(data, func, weak)?;
        Ok(next)
    }

    /// New instance with the weak flag set accordingly.
    pub fn with_weak(&self, weak: bool) -> Self {
        let mut next = self.clone();
        next.weak(weak);
        next
    }

    /// New instance without a token.
    pub fn without_etag(&self) -> Self {
        let mut next = self.clone();
        next.reset_etag();
        next
    }

    /// New instance in the strong form.
    pub fn without_weak(&self) -> Self {
        let mut next = self.clone();
        next.reset_weak();
        next
    }

    /// The rendered header value: `"token"`, `W/"token"`, or `None` when no
    /// token is set.
    pub fn get_etag(&self) -> Option<String> {
        let token = self.etag.as_ref()?;
        if self.weak {
            Some(format!("W/\"{}\"", token))
        } else {
            Some(format!("\"{}\"", token))
        }
    }
}

impl HeaderBuilder for ETagHeaderBuilder {
    fn to_headers(&self) -> HashMap<String, String> {
        match self.get_etag() {
            Some(etag) => HashMap::from([(ETAG_HEADER.to_string(), etag)]),
            None => HashMap::new(),
        }
    }
}

impl fmt::Display for ETagHeaderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_etag().unwrap_or_default())
    }
}

/// A value usable as the `ETag` header.
///
/// Raw strings pass through verbatim (a blank string stands for "no tag"),
/// while a built [`ETagHeaderBuilder`] contributes its rendered quoted form.
pub trait IntoEtagHeader {
    fn into_etag_header(self) -> Option<String>;
}

impl IntoEtagHeader for &str {
    fn into_etag_header(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl IntoEtagHeader for String {
    fn into_etag_header(self) -> Option<String> {
        self.as_str().into_etag_header()
    }
}

impl IntoEtagHeader for &ETagHeaderBuilder {
    fn into_etag_header(self) -> Option<String> {
        self.get_etag()
    }
}

impl IntoEtagHeader for ETagHeaderBuilder {
    fn into_etag_header(self) -> Option<String> {
        self.get_etag()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

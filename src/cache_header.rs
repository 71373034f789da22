//! Cache-Control and freshness header construction.
//!
//! [`CacheHeaderBuilder`] accumulates cache directives and validator
//! timestamps, then renders them as a canonical header map: lowercase names,
//! alphabetically sorted `Cache-Control` tokens joined with `", "`, and HTTP
//! dates in IMF-fixdate. The exclusive no-cache mode displaces every other
//! directive and additionally emits `Pragma: no-cache` for HTTP/1.0 caches.
//!
//! Every mutator exists twice: a `verb()` form that mutates in place and
//! chains on `&mut self`, and a `with_verb()` form that leaves the receiver
//! untouched and returns a mutated copy.
//!
//! # Examples
//!
//! ```
//! use armature_http_caching::{CacheDuration, CacheHeaderBuilder, HeaderBuilder};
//!
//! let mut cache = CacheHeaderBuilder::new();
//! cache.public().max_age(CacheDuration::hours(1)).no_transform();
//!
//! let headers = cache.to_headers();
//! assert_eq!(headers["cache-control"], "max-age=3600, no-transform, public");
//! ```
//!
//! ```
//! use armature_http_caching::{CacheHeaderBuilder, HeaderBuilder};
//!
//! let private = CacheHeaderBuilder::new().with_no_cache();
//! let headers = private.to_headers();
//! assert_eq!(
//!     headers["cache-control"],
//!     "must-revalidate, no-cache, no-store, private"
//! );
//! assert_eq!(headers["pragma"], "no-cache");
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::HeaderBuilder;
use crate::duration::CacheDuration;
use crate::error::Result;
use crate::etag::{ETAG_HEADER, IntoEtagHeader};
use crate::headers::to_date_string;
use crate::time::{DateInput, to_timestamp};

const CACHE_CONTROL_HEADER: &str = "cache-control";
const PRAGMA_HEADER: &str = "pragma";
const AGE_HEADER: &str = "age";
const LAST_MODIFIED_HEADER: &str = "last-modified";
const EXPIRES_HEADER: &str = "expires";

/// Cache audience. `private` and `public` are mutually exclusive, so a single
/// three-valued field replaces a pair of flags that could contradict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Visibility {
    #[default]
    Unset,
    Private,
    Public,
}

/// The accumulated directive fields outside no-cache mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DirectiveSet {
    max_age: Option<i64>,
    shared_max_age: Option<i64>,
    must_revalidate: bool,
    proxy_revalidate: bool,
    no_store: bool,
    visibility: Visibility,
    must_understand: bool,
    immutable: bool,
    no_transform: bool,
    stale_while_revalidate: Option<i64>,
    stale_if_error: Option<i64>,
    age: Option<i64>,
    expires: Option<i64>,
    etag: Option<String>,
}

/// Directive state is either the exclusive no-cache mode or a set of regular
/// directives. Modeling the exclusivity as a union makes "no-cache displaces
/// everything" a structural fact instead of a flag to re-check everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DirectiveState {
    NoCache,
    Directives(DirectiveSet),
}

impl Default for DirectiveState {
    fn default() -> Self {
        Self::Directives(DirectiveSet::default())
    }
}

/// Builder for `Cache-Control`, `Pragma`, `Expires`, `Age`, `Last-Modified`
/// and `ETag` response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheHeaderBuilder {
    state: DirectiveState,
    // honored in both modes, which is why it lives outside the union
    last_modified: Option<i64>,
}

impl CacheHeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a directive mutation, leaving no-cache mode first if needed.
    /// This is the single transition point out of no-cache: the previous
    /// state, last-modified included, is discarded and the mutation starts
    /// from clean directives.
    fn apply(&mut self, mutate: impl FnOnce(&mut DirectiveSet)) -> &mut Self {
        match &mut self.state {
            DirectiveState::Directives(set) => mutate(set),
            DirectiveState::NoCache => {
                trace!("leaving no-cache mode, directive state starts clean");
                self.last_modified = None;
                let mut set = DirectiveSet::default();
                mutate(&mut set);
                self.state = DirectiveState::Directives(set);
            }
        }
        self
    }

    /// Apply a mutation only to an existing directive set. Field resets never
    /// leave no-cache mode; in that mode there is nothing to clear.
    fn apply_existing(&mut self, mutate: impl FnOnce(&mut DirectiveSet)) -> &mut Self {
        if let DirectiveState::Directives(set) = &mut self.state {
            mutate(set);
        }
        self
    }

    // =========================================================================
    // Mode
    // =========================================================================

    /// Enter the exclusive no-cache mode: everything accumulated so far is
    /// reset, and rendering emits the fixed
    /// `Cache-Control: must-revalidate, no-cache, no-store, private` plus
    /// `Pragma: no-cache` pair until another directive setter exits the mode.
    pub fn no_cache(&mut self) -> &mut Self {
        trace!("entering exclusive no-cache mode");
        self.reset();
        self.state = DirectiveState::NoCache;
        self
    }

    /// New instance in no-cache mode.
    pub fn with_no_cache(&self) -> Self {
        let mut next = self.clone();
        next.no_cache();
        next
    }

    /// Clear every field back to the default state.
    pub fn reset(&mut self) -> &mut Self {
        self.state = DirectiveState::default();
        self.last_modified = None;
        self
    }

    /// New instance in the default state.
    pub fn with_reset(&self) -> Self {
        let mut next = self.clone();
        next.reset();
        next
    }

    // =========================================================================
    // Freshness lifetimes
    // =========================================================================

    /// Set `max-age`, how long the response stays fresh.
    pub fn max_age(&mut self, duration: impl Into<CacheDuration>) -> &mut Self {
        let seconds = duration.into().as_seconds();
        self.apply(|set| set.max_age = Some(seconds))
    }

    /// New instance with `max-age`.
    pub fn with_max_age(&self, duration: impl Into<CacheDuration>) -> Self {
        let mut next = self.clone();
        next.max_age(duration);
        next
    }

    /// Clear `max-age`.
    pub fn reset_max_age(&mut self) -> &mut Self {
        self.apply_existing(|set| set.max_age = None)
    }

    /// New instance without `max-age`.
    pub fn without_max_age(&self) -> Self {
        let mut next = self.clone();
        next.reset_max_age();
        next
    }

    /// Set `s-maxage`, the freshness lifetime for shared caches.
    pub fn shared_max_age(&mut self, duration: impl Into<CacheDuration>) -> &mut Self {
        let seconds = duration.into().as_seconds();
        self.apply(|set| set.shared_max_age = Some(seconds))
    }

    /// New instance with `s-maxage`.
    pub fn with_shared_max_age(&self, duration: impl Into<CacheDuration>) -> Self {
        let mut next = self.clone();
        next.shared_max_age(duration);
        next
    }

    /// Clear `s-maxage`.
    pub fn reset_shared_max_age(&mut self) -> &mut Self {
        self.apply_existing(|set| set.shared_max_age = None)
    }

    /// New instance without `s-maxage`.
    pub fn without_shared_max_age(&self) -> Self {
        let mut next = self.clone();
        next.reset_shared_max_age();
        next
    }

    /// Set `stale-while-revalidate`, how long a stale response may be served
    /// while revalidation happens in the background.
    pub fn stale_while_revalidate(&mut self, duration: impl Into<CacheDuration>) -> &mut Self {
        let seconds = duration.into().as_seconds();
        self.apply(|set| set.stale_while_revalidate = Some(seconds))
    }

    /// New instance with `stale-while-revalidate`.
    pub fn with_stale_while_revalidate(&self, duration: impl Into<CacheDuration>) -> Self {
        let mut next = self.clone();
        next.stale_while_revalidate(duration);
        next
    }

    /// Clear `stale-while-revalidate`.
    pub fn reset_stale_while_revalidate(&mut self) -> &mut Self {
        self.apply_existing(|set| set.stale_while_revalidate = None)
    }

    /// New instance without `stale-while-revalidate`.
    pub fn without_stale_while_revalidate(&self) -> Self {
        let mut next = self.clone();
        next.reset_stale_while_revalidate();
        next
    }

    /// Set `stale-if-error`, how long a stale response may be served when
    /// revalidation fails.
    pub fn stale_if_error(&mut self, duration: impl Into<CacheDuration>) -> &mut Self {
        let seconds = duration.into().as_seconds();
        self.apply(|set| set.stale_if_error = Some(seconds))
    }

    /// New instance with `stale-if-error`.
    pub fn with_stale_if_error(&self, duration: impl Into<CacheDuration>) -> Self {
        let mut next = self.clone();
        next.stale_if_error(duration);
        next
    }

    /// Clear `stale-if-error`.
    pub fn reset_stale_if_error(&mut self) -> &mut Self {
        self.apply_existing(|set| set.stale_if_error = None)
    }

    /// New instance without `stale-if-error`.
    pub fn without_stale_if_error(&self) -> Self {
        let mut next = self.clone();
        next.reset_stale_if_error();
        next
    }

    /// Set the `Age` header: how long the response has already spent in a
    /// cache, in literal seconds.
    pub fn age(&mut self, age_seconds: i64) -> &mut Self {
        self.apply(|set| set.age = Some(age_seconds))
    }

    /// New instance with an `Age` header.
    pub fn with_age(&self, age_seconds: i64) -> Self {
        let mut next = self.clone();
        next.age(age_seconds);
        next
    }

    /// Clear the `Age` header.
    pub fn reset_age(&mut self) -> &mut Self {
        self.apply_existing(|set| set.age = None)
    }

    /// New instance without an `Age` header.
    pub fn without_age(&self) -> Self {
        let mut next = self.clone();
        next.reset_age();
        next
    }

    // =========================================================================
    // Revalidation and storage flags
    // =========================================================================

    /// Set `must-revalidate`: once stale, the response must be revalidated
    /// before reuse.
    pub fn must_revalidate(&mut self) -> &mut Self {
        self.apply(|set| set.must_revalidate = true)
    }

    /// New instance with `must-revalidate`.
    pub fn with_must_revalidate(&self) -> Self {
        let mut next = self.clone();
        next.must_revalidate();
        next
    }

    /// Clear `must-revalidate`.
    pub fn reset_must_revalidate(&mut self) -> &mut Self {
        self.apply_existing(|set| set.must_revalidate = false)
    }

    /// New instance without `must-revalidate`.
    pub fn without_must_revalidate(&self) -> Self {
        let mut next = self.clone();
        next.reset_must_revalidate();
        next
    }

    /// Set `proxy-revalidate`: like `must-revalidate`, for shared caches only.
    pub fn proxy_revalidate(&mut self) -> &mut Self {
        self.apply(|set| set.proxy_revalidate = true)
    }

    /// New instance with `proxy-revalidate`.
    pub fn with_proxy_revalidate(&self) -> Self {
        let mut next = self.clone();
        next.proxy_revalidate();
        next
    }

    /// Clear `proxy-revalidate`.
    pub fn reset_proxy_revalidate(&mut self) -> &mut Self {
        self.apply_existing(|set| set.proxy_revalidate = false)
    }

    /// New instance without `proxy-revalidate`.
    pub fn without_proxy_revalidate(&self) -> Self {
        let mut next = self.clone();
        next.reset_proxy_revalidate();
        next
    }

    /// Set `no-store`: caches must not store any part of the response.
    pub fn no_store(&mut self) -> &mut Self {
        self.apply(|set| set.no_store = true)
    }

    /// New instance with `no-store`.
    pub fn with_no_store(&self) -> Self {
        let mut next = self.clone();
        next.no_store();
        next
    }

    /// Clear `no-store`.
    pub fn reset_no_store(&mut self) -> &mut Self {
        self.apply_existing(|set| set.no_store = false)
    }

    /// New instance without `no-store`.
    pub fn without_no_store(&self) -> Self {
        let mut next = self.clone();
        next.reset_no_store();
        next
    }

    /// Set `private`: only the requesting client may store the response.
    /// Clears `public`.
    pub fn private(&mut self) -> &mut Self {
        self.apply(|set| set.visibility = Visibility::Private)
    }

    /// New instance with `private`.
    pub fn with_private(&self) -> Self {
        let mut next = self.clone();
        next.private();
        next
    }

    /// Clear `private` (leaves `public` untouched).
    pub fn reset_private(&mut self) -> &mut Self {
        self.apply_existing(|set| {
            if set.visibility == Visibility::Private {
                set.visibility = Visibility::Unset;
            }
        })
    }

    /// New instance without `private`.
    pub fn without_private(&self) -> Self {
        let mut next = self.clone();
        next.reset_private();
        next
    }

    /// Set `public`: any cache may store the response. Clears `private`.
    pub fn public(&mut self) -> &mut Self {
        self.apply(|set| set.visibility = Visibility::Public)
    }

    /// New instance with `public`.
    pub fn with_public(&self) -> Self {
        let mut next = self.clone();
        next.public();
        next
    }

    /// Clear `public` (leaves `private` untouched).
    pub fn reset_public(&mut self) -> &mut Self {
        self.apply_existing(|set| {
            if set.visibility == Visibility::Public {
                set.visibility = Visibility::Unset;
            }
        })
    }

    /// New instance without `public`.
    pub fn without_public(&self) -> Self {
        let mut next = self.clone();
        next.reset_public();
        next
    }

    /// Set `must-understand`: a cache may store the response only if it
    /// understands the status code's caching requirements.
    pub fn must_understand(&mut self) -> &mut Self {
        self.apply(|set| set.must_understand = true)
    }

    /// New instance with `must-understand`.
    pub fn with_must_understand(&self) -> Self {
        let mut next = self.clone();
        next.must_understand();
        next
    }

    /// Clear `must-understand`.
    pub fn reset_must_understand(&mut self) -> &mut Self {
        self.apply_existing(|set| set.must_understand = false)
    }

    /// New instance without `must-understand`.
    pub fn without_must_understand(&self) -> Self {
        let mut next = self.clone();
        next.reset_must_understand();
        next
    }

    /// Set `immutable`: the response will not change while fresh, so
    /// revalidation is pointless.
    pub fn immutable(&mut self) -> &mut Self {
        self.apply(|set| set.immutable = true)
    }

    /// New instance with `immutable`.
    pub fn with_immutable(&self) -> Self {
        let mut next = self.clone();
        next.immutable();
        next
    }

    /// Clear `immutable`.
    pub fn reset_immutable(&mut self) -> &mut Self {
        self.apply_existing(|set| set.immutable = false)
    }

    /// New instance without `immutable`.
    pub fn without_immutable(&self) -> Self {
        let mut next = self.clone();
        next.reset_immutable();
        next
    }

    /// Set `no-transform`: intermediaries must not convert the payload.
    pub fn no_transform(&mut self) -> &mut Self {
        self.apply(|set| set.no_transform = true)
    }

    /// New instance with `no-transform`.
    pub fn with_no_transform(&self) -> Self {
        let mut next = self.clone();
        next.no_transform();
        next
    }

    /// Clear `no-transform`.
    pub fn reset_no_transform(&mut self) -> &mut Self {
        self.apply_existing(|set| set.no_transform = false)
    }

    /// New instance without `no-transform`.
    pub fn without_no_transform(&self) -> Self {
        let mut next = self.clone();
        next.reset_no_transform();
        next
    }

    // =========================================================================
    // Validators and expiry
    // =========================================================================

    /// Set the `Expires` header from a timestamp, date string, or instant.
    /// On error the builder is left unchanged.
    pub fn expires(&mut self, expires: impl Into<DateInput>) -> Result<&mut Self> {
        let timestamp = to_timestamp(expires)?;
        Ok(self.apply(|set| set.expires = Some(timestamp)))
    }

    /// New instance with an `Expires` header.
    pub fn with_expires(&self, expires: impl Into<DateInput>) -> Result<Self> {
        let mut next = self.clone();
        next.expires(expires)?;
        Ok(next)
    }

    /// Clear the `Expires` header.
    pub fn reset_expires(&mut self) -> &mut Self {
        self.apply_existing(|set| set.expires = None)
    }

    /// New instance without an `Expires` header.
    pub fn without_expires(&self) -> Self {
        let mut next = self.clone();
        next.reset_expires();
        next
    }

    /// Set the `Last-Modified` validator from a timestamp, date string, or
    /// instant. Unlike the directive setters this never exits no-cache mode:
    /// the validator is emitted in both modes. On error the builder is left
    /// unchanged.
    pub fn last_modified(&mut self, last_modified: impl Into<DateInput>) -> Result<&mut Self> {
        self.last_modified = Some(to_timestamp(last_modified)?);
        Ok(self)
    }

    /// New instance with a `Last-Modified` header.
    pub fn with_last_modified(&self, last_modified: impl Into<DateInput>) -> Result<Self> {
        let mut next = self.clone();
        next.last_modified(last_modified)?;
        Ok(next)
    }

    /// Clear the `Last-Modified` header. Works in both modes.
    pub fn reset_last_modified(&mut self) -> &mut Self {
        self.last_modified = None;
        self
    }

    /// New instance without a `Last-Modified` header.
    pub fn without_last_modified(&self) -> Self {
        let mut next = self.clone();
        next.reset_last_modified();
        next
    }

    /// Set the `ETag` header. Raw strings are emitted verbatim; a built
    /// [`ETagHeaderBuilder`](crate::ETagHeaderBuilder) contributes its rendered
    /// quoted form. A blank or empty value unsets the header (while still
    /// exiting no-cache mode).
    pub fn etag(&mut self, etag: impl IntoEtagHeader) -> &mut Self {
        let value = etag.into_etag_header();
        self.apply(|set| set.etag = value)
    }

    /// New instance with an `ETag` header.
    pub fn with_etag(&self, etag: impl IntoEtagHeader) -> Self {
        let mut next = self.clone();
        next.etag(etag);
        next
    }

    /// Clear the `ETag` header.
    pub fn reset_etag(&mut self) -> &mut Self {
        self.apply_existing(|set| set.etag = None)
    }

    /// New instance without an `ETag` header.
    pub fn without_etag(&self) -> Self {
        let mut next = self.clone();
        next.reset_etag();
        next
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// True while the exclusive no-cache mode is active.
    pub fn is_no_cache(&self) -> bool {
        matches!(self.state, DirectiveState::NoCache)
    }

    /// True when an ETag value is set.
    pub fn has_etag(&self) -> bool {
        self.get_etag().is_some()
    }

    /// The stored ETag header value, exactly as it will be emitted.
    pub fn get_etag(&self) -> Option<&str> {
        match &self.state {
            DirectiveState::Directives(set) => set.etag.as_deref(),
            DirectiveState::NoCache => None,
        }
    }

    /// True when a Last-Modified timestamp is set.
    pub fn has_last_modified(&self) -> bool {
        self.last_modified.is_some()
    }
}

impl HeaderBuilder for CacheHeaderBuilder {
    fn to_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(last_modified) = self.last_modified {
            headers.insert(
                LAST_MODIFIED_HEADER.to_string(),
                to_date_string(last_modified),
            );
        }

        let set = match &self.state {
            DirectiveState::NoCache => {
                let mut tokens = vec!["must-revalidate", "no-store", "private", "no-cache"];
                tokens.sort_unstable();
                headers.insert(CACHE_CONTROL_HEADER.to_string(), tokens.join(", "));
                headers.insert(PRAGMA_HEADER.to_string(), "no-cache".to_string());
                return headers;
            }
            DirectiveState::Directives(set) => set,
        };

        if let Some(expires) = set.expires {
            headers.insert(EXPIRES_HEADER.to_string(), to_date_string(expires));
        }

        let mut tokens: Vec<String> = Vec::new();
        if set.must_revalidate {
            tokens.push("must-revalidate".to_string());
        }
        if set.no_store {
            tokens.push("no-store".to_string());
        }
        match set.visibility {
            Visibility::Private => tokens.push("private".to_string()),
            Visibility::Public => tokens.push("public".to_string()),
            Visibility::Unset => {}
        }
        if let Some(max_age) = set.max_age {
            tokens.push(format!("max-age={}", max_age));
        }
        if let Some(shared_max_age) = set.shared_max_age {
            tokens.push(format!("s-maxage={}", shared_max_age));
        }
        if set.proxy_revalidate {
            tokens.push("proxy-revalidate".to_string());
        }
        if set.must_understand {
            tokens.push("must-understand".to_string());
        }
        if set.immutable {
            tokens.push("immutable".to_string());
        }
        if set.no_transform {
            tokens.push("no-transform".to_string());
        }
        if let Some(stale_while_revalidate) = set.stale_while_revalidate {
            tokens.push(format!("stale-while-revalidate={}", stale_while_revalidate));
        }
        if let Some(stale_if_error) = set.stale_if_error {
            tokens.push(format!("stale-if-error={}", stale_if_error));
        }
        if !tokens.is_empty() {
            tokens.sort_unstable();
            headers.insert(CACHE_CONTROL_HEADER.to_string(), tokens.join(", "));
        }

        if let Some(age) = set.age {
            headers.insert(AGE_HEADER.to_string(), age.to_string());
        }
        if let Some(etag) = &set.etag {
            headers.insert(ETAG_HEADER.to_string(), etag.clone());
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use crate::etag::ETagHeaderBuilder;

    use super::*;

    fn cache_control(builder: &CacheHeaderBuilder) -> Option<String> {
        builder.to_headers().get(CACHE_CONTROL_HEADER).cloned()
    }

    #[test]
    fn test_fresh_builder_renders_nothing() {
        let builder = CacheHeaderBuilder::new();
        assert!(builder.to_headers().is_empty());
        assert!(builder.is_empty());
        assert!(!builder.is_not_empty());
    }

    #[test]
    fn test_no_cache_renders_fixed_set() {
        let mut builder = CacheHeaderBuilder::new();
        builder.no_cache();
        assert_eq!(
            builder.to_headers(),
            HashMap::from([
                (
                    "cache-control".to_string(),
                    "must-revalidate, no-cache, no-store, private".to_string()
                ),
                ("pragma".to_string(), "no-cache".to_string()),
            ])
        );
        assert!(builder.is_no_cache());
    }

    #[test]
    fn test_no_cache_discards_previous_directives() {
        let mut builder = CacheHeaderBuilder::new();
        builder.max_age(3600).public();
        builder.expires(1634025600).unwrap();
        builder.no_cache();
        let headers = builder.to_headers();
        assert!(!headers.contains_key("expires"));
        assert_eq!(
            headers["cache-control"],
            "must-revalidate, no-cache, no-store, private"
        );
    }

    #[test]
    fn test_directive_setter_exits_no_cache() {
        let mut builder = CacheHeaderBuilder::new();
        builder.no_cache();
        builder.shared_max_age(CacheDuration::seconds(10));
        assert!(!builder.is_no_cache());
        let rendered = cache_control(&builder).unwrap();
        assert!(!rendered.contains("no-cache"));
        assert_eq!(rendered, "s-maxage=10");
        assert!(!builder.to_headers().contains_key("pragma"));
    }

    #[test]
    fn test_every_flag_setter_exits_no_cache() {
        let mutators: Vec<(&str, fn(&mut CacheHeaderBuilder))> = vec![
            ("must_revalidate", |b| {
                b.must_revalidate();
            }),
            ("proxy_revalidate", |b| {
                b.proxy_revalidate();
            }),
            ("no_store", |b| {
                b.no_store();
            }),
            ("private", |b| {
                b.private();
            }),
            ("public", |b| {
                b.public();
            }),
            ("must_understand", |b| {
                b.must_understand();
            }),
            ("immutable", |b| {
                b.immutable();
            }),
            ("no_transform", |b| {
                b.no_transform();
            }),
            ("max_age", |b| {
                b.max_age(1);
            }),
            ("age", |b| {
                b.age(1);
            }),
            ("etag", |b| {
                b.etag("x");
            }),
        ];
        for (name, mutate) in mutators {
            let mut builder = CacheHeaderBuilder::new();
            builder.no_cache();
            mutate(&mut builder);
            assert!(!builder.is_no_cache(), "{} left no-cache mode set", name);
            let rendered = cache_control(&builder).unwrap_or_default();
            assert!(
                !rendered.contains("no-cache"),
                "{} still renders no-cache: {}",
                name,
                rendered
            );
        }
    }

    #[test]
    fn test_exiting_no_cache_starts_from_clean_state() {
        let mut builder = CacheHeaderBuilder::new();
        builder.max_age(3600);
        builder.no_cache();
        builder.no_store();
        // the pre-no-cache max-age must not resurface
        assert_eq!(cache_control(&builder).unwrap(), "no-store");
    }

    #[test]
    fn test_last_modified_survives_in_no_cache_mode() {
        let mut builder = CacheHeaderBuilder::new();
        builder.no_cache();
        builder.last_modified(1634025600).unwrap();
        assert!(builder.is_no_cache());
        let headers = builder.to_headers();
        assert_eq!(headers["last-modified"], "Tue, 12 Oct 2021 08:00:00 GMT");
        assert_eq!(headers["pragma"], "no-cache");
    }

    #[test]
    fn test_entering_no_cache_clears_last_modified() {
        let mut builder = CacheHeaderBuilder::new();
        builder.last_modified(1634025600).unwrap();
        builder.no_cache();
        assert!(!builder.has_last_modified());
        assert!(!builder.to_headers().contains_key("last-modified"));
    }

    #[test]
    fn test_leaving_no_cache_clears_last_modified() {
        let mut builder = CacheHeaderBuilder::new();
        builder.no_cache();
        builder.last_modified(1634025600).unwrap();
        builder.max_age(60);
        assert!(!builder.has_last_modified());
        assert_eq!(cache_control(&builder).unwrap(), "max-age=60");
    }

    #[test]
    fn test_each_flag_renders_its_token() {
        let cases: Vec<(fn(&mut CacheHeaderBuilder), &str)> = vec![
            (
                |b| {
                    b.must_revalidate();
                },
                "must-revalidate",
            ),
            (
                |b| {
                    b.proxy_revalidate();
                },
                "proxy-revalidate",
            ),
            (
                |b| {
                    b.no_store();
                },
                "no-store",
            ),
            (
                |b| {
                    b.private();
                },
                "private",
            ),
            (
                |b| {
                    b.public();
                },
                "public",
            ),
            (
                |b| {
                    b.must_understand();
                },
                "must-understand",
            ),
            (
                |b| {
                    b.immutable();
                },
                "immutable",
            ),
            (
                |b| {
                    b.no_transform();
                },
                "no-transform",
            ),
        ];
        for (mutate, token) in cases {
            let mut builder = CacheHeaderBuilder::new();
            mutate(&mut builder);
            assert_eq!(cache_control(&builder).as_deref(), Some(token));
        }
    }

    #[test]
    fn test_max_age_from_duration_units() {
        let builder = CacheHeaderBuilder::new().with_max_age(CacheDuration::days(3));
        assert_eq!(cache_control(&builder).as_deref(), Some("max-age=259200"));
    }

    #[test]
    fn test_max_age_from_bare_seconds() {
        let builder = CacheHeaderBuilder::new().with_max_age(3600);
        assert_eq!(cache_control(&builder).as_deref(), Some("max-age=3600"));
    }

    #[test]
    fn test_tokens_join_sorted() {
        let mut builder = CacheHeaderBuilder::new();
        builder.max_age(3600).no_store();
        assert_eq!(
            cache_control(&builder).as_deref(),
            Some("max-age=3600, no-store")
        );
    }

    #[test]
    fn test_tokens_sort_lexicographically() {
        let mut builder = CacheHeaderBuilder::new();
        builder
            .public()
            .no_transform()
            .shared_max_age(100)
            .max_age(200);
        assert_eq!(
            cache_control(&builder).as_deref(),
            Some("max-age=200, no-transform, public, s-maxage=100")
        );
    }

    #[test]
    fn test_age_renders_as_own_header() {
        let mut builder = CacheHeaderBuilder::new();
        builder.max_age(3600).age(1800);
        let headers = builder.to_headers();
        assert_eq!(headers["cache-control"], "max-age=3600");
        assert_eq!(headers["age"], "1800");
    }

    #[test]
    fn test_expires_renders_http_date() {
        let mut builder = CacheHeaderBuilder::new();
        builder.expires("2021-10-12T08:00:00Z").unwrap();
        assert_eq!(
            builder.to_headers()["expires"],
            "Tue, 12 Oct 2021 08:00:00 GMT"
        );
    }

    #[test]
    fn test_expires_error_leaves_builder_unchanged() {
        let mut builder = CacheHeaderBuilder::new();
        builder.no_cache();
        assert!(builder.expires("apple").is_err());
        assert!(builder.is_no_cache());
    }

    #[test]
    fn test_last_modified_renders_http_date() {
        let mut builder = CacheHeaderBuilder::new();
        builder.last_modified("Tue, 15 Nov 1994 12:45:26 GMT").unwrap();
        assert!(builder.has_last_modified());
        assert_eq!(
            builder.to_headers()["last-modified"],
            "Tue, 15 Nov 1994 12:45:26 GMT"
        );
    }

    #[test]
    fn test_private_and_public_are_exclusive() {
        let mut builder = CacheHeaderBuilder::new();
        builder.private().public();
        assert_eq!(cache_control(&builder).as_deref(), Some("public"));

        let mut builder = CacheHeaderBuilder::new();
        builder.public().private();
        assert_eq!(cache_control(&builder).as_deref(), Some("private"));
    }

    #[test]
    fn test_reset_private_keeps_public() {
        let mut builder = CacheHeaderBuilder::new();
        builder.public();
        builder.reset_private();
        assert_eq!(cache_control(&builder).as_deref(), Some("public"));
        builder.reset_public();
        assert!(builder.is_empty());
    }

    #[test]
    fn test_raw_etag_renders_verbatim() {
        let mut builder = CacheHeaderBuilder::new();
        builder.etag("bare-token");
        assert_eq!(builder.to_headers()["etag"], "bare-token");
        assert_eq!(builder.get_etag(), Some("bare-token"));
        assert!(builder.has_etag());
    }

    #[test]
    fn test_built_etag_renders_quoted() {
        let etag = ETagHeaderBuilder::new().with_etag("123", true);
        let builder = CacheHeaderBuilder::new().with_etag(&etag);
        assert_eq!(builder.to_headers()["etag"], "W/\"123\"");
    }

    #[test]
    fn test_blank_etag_unsets() {
        let mut builder = CacheHeaderBuilder::new();
        builder.etag("123");
        builder.etag("   ");
        assert!(!builder.has_etag());
        assert!(builder.to_headers().is_empty());
    }

    #[test]
    fn test_empty_etag_builder_unsets() {
        let mut builder = CacheHeaderBuilder::new();
        builder.etag("123");
        builder.etag(ETagHeaderBuilder::new());
        assert!(!builder.has_etag());
    }

    #[test]
    fn test_reset_returns_to_default() {
        let mut builder = CacheHeaderBuilder::new();
        builder.max_age(3600).public().age(10);
        builder.last_modified(0).unwrap();
        builder.reset();
        assert_eq!(builder, CacheHeaderBuilder::new());
        assert!(builder.is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = CacheHeaderBuilder::new();
        once.max_age(1).reset();
        let mut twice = CacheHeaderBuilder::new();
        twice.max_age(1).reset().reset();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_field_resets_clear_only_their_field() {
        let mut builder = CacheHeaderBuilder::new();
        builder.max_age(3600).no_store().age(10);
        builder.reset_max_age();
        let headers = builder.to_headers();
        assert_eq!(headers["cache-control"], "no-store");
        assert_eq!(headers["age"], "10");
    }

    #[test]
    fn test_field_reset_keeps_no_cache_mode() {
        let mut builder = CacheHeaderBuilder::new();
        builder.no_cache();
        builder.reset_max_age();
        assert!(builder.is_no_cache());
        builder.reset_last_modified();
        assert!(builder.is_no_cache());
    }

    #[test]
    fn test_with_no_cache_clone_independence() {
        let base = CacheHeaderBuilder::new().with_max_age(3600);
        let no_cache = base.with_no_cache();
        assert!(no_cache.is_no_cache());
        assert!(!base.is_no_cache());
        assert_eq!(cache_control(&base).as_deref(), Some("max-age=3600"));
    }

    #[test]
    fn test_with_setters_clone_independence() {
        let base = CacheHeaderBuilder::new();
        let with_max_age = base.with_max_age(60);
        let with_flag = base.with_no_store();
        let with_age = base.with_age(5);
        let with_etag = base.with_etag("t");
        let with_expires = base.with_expires(0).unwrap();
        let with_last_modified = base.with_last_modified(0).unwrap();
        assert!(base.is_empty());
        assert!(with_max_age.is_not_empty());
        assert!(with_flag.is_not_empty());
        assert!(with_age.is_not_empty());
        assert!(with_etag.is_not_empty());
        assert!(with_expires.is_not_empty());
        assert!(with_last_modified.is_not_empty());
    }

    #[test]
    fn test_without_family_clone_independence() {
        let mut base = CacheHeaderBuilder::new();
        base.max_age(60).no_store().public().age(5).etag("t");
        base.expires(0).unwrap();
        base.last_modified(0).unwrap();
        let snapshot = base.clone();

        assert!(base.without_max_age().to_headers()["cache-control"] == "no-store, public");
        assert!(!base.without_age().to_headers().contains_key("age"));
        assert!(!base.without_etag().has_etag());
        assert!(!base.without_expires().to_headers().contains_key("expires"));
        assert!(!base.without_last_modified().has_last_modified());
        assert!(
            !base.without_no_store().to_headers()["cache-control"].contains("no-store")
        );
        assert!(
            !base.without_public().to_headers()["cache-control"].contains("public")
        );
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_with_reset_clone_independence() {
        let base = CacheHeaderBuilder::new().with_max_age(60);
        let fresh = base.with_reset();
        assert!(fresh.is_empty());
        assert!(base.is_not_empty());
    }

    #[test]
    fn test_negative_max_age_passes_through() {
        let builder = CacheHeaderBuilder::new().with_max_age(-5);
        assert_eq!(cache_control(&builder).as_deref(), Some("max-age=-5"));
    }
}

// HTTP caching header construction and conditional request evaluation for Armature

pub mod cache_header;
pub mod conditional;
pub mod duration;
pub mod error;
pub mod etag;
pub mod headers;
pub mod time;

pub use cache_header::CacheHeaderBuilder;
pub use conditional::{ETagMatchResult, ETagMatcher, ModifiedMatchResult, ModifiedMatcher};
pub use duration::CacheDuration;
pub use error::{CachingError, Result};
pub use etag::{ETagHeaderBuilder, IntoEtagHeader};
pub use headers::{
    HeaderValue, RawHeaders, first_header_value, is_valid_date_string, normalize_headers,
    replace_headers, to_date_string,
};
pub use time::{DateInput, to_timestamp};

use std::collections::HashMap;

/// Anything that renders itself as a set of response headers.
///
/// Header names are lowercase and values are fully formatted, ready to be
/// copied onto a response.
pub trait HeaderBuilder {
    /// Render the accumulated state as a header map. An empty map means
    /// nothing to emit.
    fn to_headers(&self) -> HashMap<String, String>;

    /// True when [`to_headers`](Self::to_headers) would emit nothing.
    fn is_empty(&self) -> bool {
        self.to_headers().is_empty()
    }

    fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }
}

// Error types for caching header operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CachingError {
    #[error("Date string is empty")]
    EmptyDateInput,

    #[error("Malformed date string: {0}")]
    MalformedDate(String),

    #[error("Computed ETag must be a string or null, got {0}")]
    InvalidComputedEtag(&'static str),

    #[error("Invalid {0} header value")]
    InvalidConditionalHeader(&'static str),

    #[error("Internal consistency violation: {0}")]
    InternalConsistency(&'static str),
}

pub type Result<T> = std::result::Result<T, CachingError>;

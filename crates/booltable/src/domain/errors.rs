//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("option text '{pattern}' is not a valid pattern: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("navigation history is unavailable")]
    Unavailable,
}

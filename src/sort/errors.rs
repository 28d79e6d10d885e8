//! Sort error types
//!
//! Error codes:
//! - LIST_SORT_UNKNOWN_KEY
//! - LIST_SORT_INCOMPATIBLE_RANDOM
//! - LIST_SORT_INVALID_TOKEN

use thiserror::Error;

/// Result type for sort resolution
pub type SortResult<T> = Result<T, SortError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("Unknown sort key '{key}'. Available: {}", .available.join(", "))]
    UnknownSortKey { key: String, available: Vec<String> },

    #[error("Random sort cannot be combined with other sort keys")]
    IncompatibleRandomSort,

    #[error("Invalid sort token '{token}': {reason}")]
    InvalidToken { token: String, reason: String },
}

impl SortError {
    pub(crate) fn invalid_token(token: &str, reason: impl Into<String>) -> Self {
        SortError::InvalidToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SortError::UnknownSortKey { .. } => "LIST_SORT_UNKNOWN_KEY",
            SortError::IncompatibleRandomSort => "LIST_SORT_INCOMPATIBLE_RANDOM",
            SortError::InvalidToken { .. } => "LIST_SORT_INVALID_TOKEN",
        }
    }
}

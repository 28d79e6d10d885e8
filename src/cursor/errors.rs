//! Cursor error types
//!
//! Error codes:
//! - LIST_CURSOR_MALFORMED (client sent a bad `after` token)
//! - LIST_CURSOR_MISSING_FIELD (result row lacks a sort key)
//! - LIST_CURSOR_INVALID_FIELD (result row holds a sort key of the wrong type)
//! - LIST_CURSOR_UNREADABLE_ROW (result row does not serialize to a JSON object)

use thiserror::Error;

pub type CursorResult<T> = Result<T, CursorError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("Malformed cursor: {reason}")]
    Malformed { reason: String },

    #[error("Row has no value for non-nullable sort key '{key}'")]
    MissingField { key: String },

    #[error("Row value for sort key '{key}' does not match its declared type")]
    InvalidField { key: String },

    #[error("Row cannot be read for cursor encoding: {reason}")]
    UnreadableRow { reason: String },
}

impl CursorError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CursorError::Malformed {
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CursorError::Malformed { .. } => "LIST_CURSOR_MALFORMED",
            CursorError::MissingField { .. } => "LIST_CURSOR_MISSING_FIELD",
            CursorError::InvalidField { .. } => "LIST_CURSOR_INVALID_FIELD",
            CursorError::UnreadableRow { .. } => "LIST_CURSOR_UNREADABLE_ROW",
        }
    }

    /// Returns true if the client caused the error
    pub fn is_client_error(&self) -> bool {
        matches!(self, CursorError::Malformed { .. })
    }
}

//! Keyset error types
//!
//! Error codes:
//! - LIST_CURSOR_MISMATCH (a well-formed cursor does not fit the resolved order)
//!
//! Boundary errors are client input errors.

use thiserror::Error;

pub type BoundaryResult<T> = Result<T, BoundaryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    #[error("Cursor does not match the sort order: {0}")]
    Mismatch(String),
}

impl BoundaryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            BoundaryError::Mismatch(_) => "LIST_CURSOR_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_code_and_message() {
        let err = BoundaryError::Mismatch("expected 2 values, found 3".into());
        assert_eq!(err.code(), "LIST_CURSOR_MISMATCH");
        assert_eq!(
            err.to_string(),
            "Cursor does not match the sort order: expected 2 values, found 3"
        );
    }
}

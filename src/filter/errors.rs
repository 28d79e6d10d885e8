//! Filter error types
//!
//! Error codes:
//! - LIST_FILTER_SYNTAX
//! - LIST_FILTER_UNKNOWN_PROPERTY
//! - LIST_FILTER_TYPE_MISMATCH
//! - LIST_FILTER_INVALID_ENUM_VALUE
//! - LIST_FILTER_ARRAY_OPERATOR
//! - LIST_FILTER_UNSUPPORTED_OPERATOR
//!
//! All filter errors are client input errors.

use thiserror::Error;

use super::ast::FilterOp;
use crate::value::ValueType;

/// Result type for filter parsing and compilation
pub type FilterResult<T> = Result<T, FilterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid filter at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Unknown filter property '{name}'. Available: {}", .available.join(", "))]
    UnknownProperty {
        name: String,
        available: Vec<String>,
    },

    #[error("Property '{property}' expects a value of type {expected} but got {got}")]
    TypeMismatch {
        property: String,
        expected: ValueType,
        got: ValueType,
    },

    #[error("Invalid value '{value}' for '{property}'. Allowed: {}", .allowed.join(", "))]
    InvalidEnumValue {
        property: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Operator '{operator}' cannot be used on array property '{property}'; use eq or has")]
    UnsupportedOperatorForArray { property: String, operator: FilterOp },

    #[error("Operator '{operator}' can only be used on array properties, not '{property}'")]
    UnsupportedOperator { property: String, operator: FilterOp },
}

impl FilterError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        FilterError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::Syntax { .. } => "LIST_FILTER_SYNTAX",
            FilterError::UnknownProperty { .. } => "LIST_FILTER_UNKNOWN_PROPERTY",
            FilterError::TypeMismatch { .. } => "LIST_FILTER_TYPE_MISMATCH",
            FilterError::InvalidEnumValue { .. } => "LIST_FILTER_INVALID_ENUM_VALUE",
            FilterError::UnsupportedOperatorForArray { .. } => "LIST_FILTER_ARRAY_OPERATOR",
            FilterError::UnsupportedOperator { .. } => "LIST_FILTER_UNSUPPORTED_OPERATOR",
        }
    }
}

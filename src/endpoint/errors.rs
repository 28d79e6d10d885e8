//! # Endpoint Errors
//!
//! `RegistryError` is raised while building an endpoint and is fatal at
//! startup. `QueryError` is the per-request error surface; it never picks
//! an HTTP status itself, only an `ErrorClass` the HTTP layer maps.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::cursor::CursorError;
use crate::filter::FilterError;
use crate::keyset::BoundaryError;
use crate::sort::SortError;
use crate::value::ValueType;

/// Result type for request resolution
pub type QueryResult<T> = Result<T, QueryError>;

/// Endpoint misconfiguration, detected at registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Property '{0}' is declared more than once")]
    DuplicateProperty(String),

    #[error("Enum property '{0}' declares no values")]
    EmptyEnum(String),

    #[error("Primary key '{0}' cannot be nullable")]
    NullablePrimaryKey(String),

    #[error("Primary key '{name}' has type {value_type}; only int and string are supported")]
    UnsupportedPrimaryKey { name: String, value_type: ValueType },

    #[error("Invalid default sort: {0}")]
    InvalidDefaultSort(String),

    #[error("Invalid limits: default {default_limit}, max {max_limit}")]
    InvalidLimits {
        default_limit: usize,
        max_limit: usize,
    },
}

impl RegistryError {
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateProperty(_) => "LIST_REGISTRY_DUPLICATE_PROPERTY",
            RegistryError::EmptyEnum(_) => "LIST_REGISTRY_EMPTY_ENUM",
            RegistryError::NullablePrimaryKey(_) => "LIST_REGISTRY_NULLABLE_PRIMARY_KEY",
            RegistryError::UnsupportedPrimaryKey { .. } => "LIST_REGISTRY_UNSUPPORTED_PRIMARY_KEY",
            RegistryError::InvalidDefaultSort(_) => "LIST_REGISTRY_INVALID_DEFAULT_SORT",
            RegistryError::InvalidLimits { .. } => "LIST_REGISTRY_INVALID_LIMITS",
        }
    }
}

/// How the HTTP layer should surface a `QueryError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Well-formed request with semantically invalid filter or sort (422)
    Unprocessable,
    /// Malformed request parameters or cursor (400)
    BadRequest,
    /// Endpoint misconfiguration discovered while serving (500)
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Unprocessable => "unprocessable",
            ErrorClass::BadRequest => "bad_request",
            ErrorClass::Internal => "internal",
        }
    }

    /// Conventional HTTP status for this class
    pub fn status(&self) -> u16 {
        match self {
            ErrorClass::Unprocessable => 422,
            ErrorClass::BadRequest => 400,
            ErrorClass::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    // ==================
    // Semantic (422)
    // ==================
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sort(#[from] SortError),

    // ==================
    // Malformed (400)
    // ==================
    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    #[error("Invalid limit '{0}': expected a non-negative integer")]
    InvalidLimit(String),

    #[error("Limit {limit} exceeds maximum {max}")]
    LimitExceeded { limit: usize, max: usize },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Filter(e) => e.code(),
            QueryError::Sort(e) => e.code(),
            QueryError::Cursor(e) => e.code(),
            QueryError::Boundary(e) => e.code(),
            QueryError::InvalidLimit(_) => "LIST_INVALID_LIMIT",
            QueryError::LimitExceeded { .. } => "LIST_LIMIT_EXCEEDED",
            QueryError::InvalidParameter { .. } => "LIST_INVALID_PARAMETER",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            QueryError::Filter(_) | QueryError::Sort(_) => ErrorClass::Unprocessable,
            QueryError::Cursor(e) if !e.is_client_error() => ErrorClass::Internal,
            QueryError::Cursor(_)
            | QueryError::Boundary(_)
            | QueryError::InvalidLimit(_)
            | QueryError::LimitExceeded { .. }
            | QueryError::InvalidParameter { .. } => ErrorClass::BadRequest,
        }
    }
}

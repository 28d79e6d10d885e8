//! Catalog loading errors
//!
//! All catalog errors are fatal at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::endpoint::RegistryError;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Resource '{resource}': {source}")]
    Registry {
        resource: String,
        source: RegistryError,
    },

    #[error("Resource '{resource}', property '{property}': {reason}")]
    InvalidProperty {
        resource: String,
        property: String,
        reason: String,
    },
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Read { .. } => "LIST_CATALOG_READ",
            CatalogError::Parse(_) => "LIST_CATALOG_PARSE",
            CatalogError::Registry { source, .. } => source.code(),
            CatalogError::InvalidProperty { .. } => "LIST_CATALOG_INVALID_PROPERTY",
        }
    }
}

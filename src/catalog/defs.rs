//! Serde shapes of the catalog file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::value::ValueType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDef {
    pub resources: BTreeMap<String, ResourceDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDef {
    pub primary_key: KeyDef,

    #[serde(default)]
    pub filters: Vec<FilterDef>,

    #[serde(default)]
    pub sorts: Vec<SortDef>,

    /// Tokens used when a request names no sort
    #[serde(default)]
    pub default_sort: Vec<String>,

    #[serde(default)]
    pub default_limit: Option<usize>,

    #[serde(default)]
    pub max_limit: Option<usize>,

    /// Rows served by the in-memory engine
    #[serde(default)]
    pub rows: Vec<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDef {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterDef {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub array: bool,
    /// Members of an enum property
    #[serde(default)]
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortDef {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub nullable: bool,
}

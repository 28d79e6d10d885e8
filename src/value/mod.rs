//! Typed literal values shared by the filter language, sort keys and cursors.
//!
//! # Tags
//!
//! - `Int`: 64-bit signed integer
//! - `Float`: 64-bit float, totally ordered via `total_cmp`
//! - `Date`: ISO-8601 calendar date
//! - `Str`: free text
//! - `Enum`: one member of a declared enumeration
//!
//! Values of different tags never compare with each other.

mod literal;

pub use literal::parse_literal;

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Declared type of a filterable or sortable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Int,
    Float,
    Date,
    #[serde(rename = "string", alias = "str")]
    Str,
    Enum,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Date => "date",
            ValueType::Str => "string",
            ValueType::Enum => "enum",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Str(String),
    Enum(String),
}

impl Value {
    /// Parses an unquoted literal, picking the most specific tag.
    pub fn parse_literal(text: &str) -> Self {
        parse_literal(text)
    }

    /// Returns the tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Date(_) => ValueType::Date,
            Value::Str(_) => ValueType::Str,
            Value::Enum(_) => ValueType::Enum,
        }
    }

    /// Returns the textual payload of `Str` and `Enum` values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Compares two values of the same tag.
    ///
    /// Returns `None` when the tags differ. `Str` and `Enum` compare with
    /// each other by text since both are stored as text columns.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Str(a) | Value::Enum(a), Value::Str(b) | Value::Enum(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Reads a value of the given declared type out of a JSON field.
    ///
    /// Returns `None` for JSON null and for fields whose JSON shape cannot
    /// hold the declared type.
    pub fn from_json(json: &JsonValue, value_type: ValueType) -> Option<Self> {
        match (value_type, json) {
            (ValueType::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int),
            (ValueType::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float),
            (ValueType::Date, JsonValue::String(s)) => {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date)
            }
            (ValueType::Str, JsonValue::String(s)) => Some(Value::Str(s.clone())),
            (ValueType::Enum, JsonValue::String(s)) => Some(Value::Enum(s.clone())),
            _ => None,
        }
    }

    /// Converts this value into its JSON representation
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Int(i) => JsonValue::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Value::Str(s) | Value::Enum(s) => JsonValue::String(s.clone()),
        }
    }

    /// Canonical text used when hashing primary keys
    pub fn canonical_text(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Str(s) | Value::Enum(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Value::Str(s) | Value::Enum(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

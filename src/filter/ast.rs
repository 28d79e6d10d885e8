//! Filter expression AST.
//!
//! Produced by the filter-string parser or built programmatically; checked
//! and lowered to a `Predicate` by the compiler.

use std::fmt;

use crate::value::Value;

/// Comparison operators of the filter language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// Array membership
    Has,
}

impl FilterOp {
    /// Returns the operator keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
            FilterOp::Has => "has",
        }
    }

    /// Parses a keyword (`eq`) or symbol (`=`), case-insensitively
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "eq" | "=" => Some(FilterOp::Eq),
            "ne" | "!=" => Some(FilterOp::Ne),
            "gt" | ">" => Some(FilterOp::Gt),
            "ge" | ">=" => Some(FilterOp::Ge),
            "lt" | "<" => Some(FilterOp::Lt),
            "le" | "<=" => Some(FilterOp::Le),
            "has" => Some(FilterOp::Has),
            _ => None,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boolean expression over named properties
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Cmp {
        property: String,
        op: FilterOp,
        value: Value,
    },
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
}

impl FilterExpr {
    pub fn cmp(property: impl Into<String>, op: FilterOp, value: Value) -> Self {
        FilterExpr::Cmp {
            property: property.into(),
            op,
            value,
        }
    }

    pub fn eq(property: impl Into<String>, value: Value) -> Self {
        Self::cmp(property, FilterOp::Eq, value)
    }

    pub fn and(self, rhs: FilterExpr) -> Self {
        FilterExpr::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: FilterExpr) -> Self {
        FilterExpr::Or(Box::new(self), Box::new(rhs))
    }

    pub fn not(self) -> Self {
        FilterExpr::Not(Box::new(self))
    }
}

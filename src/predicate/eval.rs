//! In-memory predicate evaluation over JSON rows.
//!
//! Uses SQL three-valued logic so that the reference engine agrees with a
//! relational database on NULL handling: a comparison against NULL or a
//! missing field is UNKNOWN, and a row matches only when the predicate is
//! TRUE.

use std::cmp::Ordering;

use serde_json::Value as JsonValue;

use super::{CompareOp, Expr, Predicate};
use crate::sort::seeded_hash_json;
use crate::value::Value;

/// Result of evaluating a predicate under three-valued logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    fn from_bool(b: bool) -> Self {
        if b {
            Truth::True
        } else {
            Truth::False
        }
    }

    fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

/// Returns true only if the predicate evaluates to TRUE for the row
pub fn matches(row: &JsonValue, predicate: &Predicate) -> bool {
    evaluate(row, predicate) == Truth::True
}

/// Evaluates a predicate against a row
pub fn evaluate(row: &JsonValue, predicate: &Predicate) -> Truth {
    match predicate {
        Predicate::Compare { expr, op, value } => compare(row, expr, *op, value),
        Predicate::Contains { column, value } => contains(row, column, value),
        Predicate::IsNull(expr) => Truth::from_bool(is_null(row, expr)),
        Predicate::And(terms) => terms
            .iter()
            .fold(Truth::True, |acc, t| acc.and(evaluate(row, t))),
        Predicate::Or(terms) => terms
            .iter()
            .fold(Truth::False, |acc, t| acc.or(evaluate(row, t))),
        Predicate::Not(inner) => evaluate(row, inner).not(),
    }
}

fn field<'a>(row: &'a JsonValue, column: &str) -> Option<&'a JsonValue> {
    row.get(column).filter(|v| !v.is_null())
}

fn is_null(row: &JsonValue, expr: &Expr) -> bool {
    match expr {
        Expr::Column(c) => field(row, c).is_none(),
        Expr::SeededHash { column, .. } => field(row, column).is_none(),
    }
}

fn resolve(row: &JsonValue, expr: &Expr, like: &Value) -> Option<Value> {
    match expr {
        Expr::Column(c) => Value::from_json(field(row, c)?, like.value_type()),
        Expr::SeededHash { seed, column } => {
            seeded_hash_json(*seed, field(row, column)?).map(Value::Int)
        }
    }
}

fn compare(row: &JsonValue, expr: &Expr, op: CompareOp, value: &Value) -> Truth {
    let actual = match resolve(row, expr, value) {
        Some(v) => v,
        None => return Truth::Unknown,
    };
    let ordering = match actual.compare(value) {
        Some(o) => o,
        None => return Truth::Unknown,
    };
    Truth::from_bool(match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
    })
}

fn contains(row: &JsonValue, column: &str, value: &Value) -> Truth {
    let items = match field(row, column).and_then(JsonValue::as_array) {
        Some(items) => items,
        None => return Truth::Unknown,
    };
    let found = items.iter().any(|item| {
        Value::from_json(item, value.value_type())
            .and_then(|v| v.compare(value))
            .is_some_and(|o| o == Ordering::Equal)
    });
    Truth::from_bool(found)
}

//! ORDER BY terms and the matching in-memory row comparator.
//!
//! Every term sorts NULLs after all non-null values, in both directions.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value as JsonValue;

use super::random::seeded_hash_json;
use super::spec::{SortDirection, SortKey};
use crate::predicate::Expr;
use crate::value::{Value, ValueType};

/// One term of the ORDER BY handed to the storage engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub expr: Expr,
    pub value_type: ValueType,
    pub nullable: bool,
    pub direction: SortDirection,
}

impl OrderTerm {
    pub(crate) fn from_key(key: &SortKey) -> Self {
        Self {
            expr: key.expr.clone(),
            value_type: key.value_type,
            nullable: key.nullable,
            direction: key.direction,
        }
    }

    /// Reads this term's value from a row; `None` is NULL
    pub fn read(&self, row: &JsonValue) -> Option<Value> {
        match &self.expr {
            Expr::Column(c) => row
                .get(c)
                .and_then(|field| Value::from_json(field, self.value_type)),
            Expr::SeededHash { seed, column } => row
                .get(column)
                .and_then(|field| seeded_hash_json(*seed, field))
                .map(Value::Int),
        }
    }
}

impl fmt::Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        write!(f, "{} {}", self.expr, direction)?;
        if self.nullable {
            f.write_str(" NULLS LAST")?;
        }
        Ok(())
    }
}

/// Compares two optional values: NULLS LAST, then direction
pub fn compare_nullable(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.compare(b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Compares two rows under an ORDER BY sequence
pub fn compare_rows(a: &JsonValue, b: &JsonValue, order: &[OrderTerm]) -> Ordering {
    for term in order {
        let ordering = compare_nullable(term.read(a).as_ref(), term.read(b).as_ref(), term.direction);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating_desc() -> OrderTerm {
        OrderTerm {
            expr: Expr::column("rating"),
            value_type: ValueType::Float,
            nullable: true,
            direction: SortDirection::Desc,
        }
    }

    fn id_asc() -> OrderTerm {
        OrderTerm {
            expr: Expr::column("id"),
            value_type: ValueType::Int,
            nullable: false,
            direction: SortDirection::Asc,
        }
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let some = Value::Int(1);
        assert_eq!(
            compare_nullable(None, Some(&some), SortDirection::Asc),
            Ordering::Greater
        );
        assert_eq!(
            compare_nullable(None, Some(&some), SortDirection::Desc),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_rows() {
        let order = [rating_desc(), id_asc()];
        let mut rows = vec![
            json!({"id": 1, "rating": 7.0}),
            json!({"id": 2, "rating": null}),
            json!({"id": 3, "rating": 9.0}),
            json!({"id": 4, "rating": 7.0}),
            json!({"id": 5}),
        ];
        rows.sort_by(|a, b| compare_rows(a, b, &order));
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_display() {
        assert_eq!(rating_desc().to_string(), "rating DESC NULLS LAST");
        assert_eq!(id_asc().to_string(), "id ASC");
    }
}

//! Boundary predicate builder.
//!
//! Checks the cursor against the resolved order, then emits one level per
//! order term as described in the module docs.

use super::errors::{BoundaryError, BoundaryResult};
use crate::cursor::Cursor;
use crate::predicate::{CompareOp, Predicate};
use crate::sort::{OrderTerm, SortDirection, SortSpec};
use crate::value::Value;

fn equal(term: &OrderTerm, value: Option<&Value>) -> Predicate {
    match value {
        Some(v) => Predicate::compare(term.expr.clone(), CompareOp::Eq, v.clone()),
        None => Predicate::is_null(term.expr.clone()),
    }
}

fn strictly_after(term: &OrderTerm, value: &Value) -> Predicate {
    let op = match term.direction {
        SortDirection::Asc => CompareOp::Gt,
        SortDirection::Desc => CompareOp::Lt,
    };
    let after = Predicate::compare(term.expr.clone(), op, value.clone());
    if term.nullable {
        after.or(Predicate::is_null(term.expr.clone()))
    } else {
        after
    }
}

fn check(cursor: &Cursor, order: &[OrderTerm]) -> BoundaryResult<()> {
    if cursor.len() != order.len() {
        return Err(BoundaryError::Mismatch(format!(
            "expected {} values, found {}",
            order.len(),
            cursor.len()
        )));
    }
    for (term, value) in order.iter().zip(cursor.values()) {
        match value {
            None if !term.nullable => {
                return Err(BoundaryError::Mismatch(format!("{} cannot be null", term.expr)));
            }
            Some(v) if v.value_type() != term.value_type => {
                return Err(BoundaryError::Mismatch(format!(
                    "{} expects {} but cursor holds {}",
                    term.expr,
                    term.value_type,
                    v.value_type()
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Builds the predicate selecting rows strictly after `cursor` under `spec`
pub fn boundary(cursor: &Cursor, spec: &SortSpec) -> BoundaryResult<Predicate> {
    let order = spec.order_by();
    check(cursor, &order)?;

    let values = cursor.values();
    let mut levels = Vec::with_capacity(order.len());
    for (i, term) in order.iter().enumerate() {
        let Some(value) = &values[i] else {
            continue;
        };
        let prefix = order[..i]
            .iter()
            .zip(&values[..i])
            .map(|(t, v)| equal(t, v.as_ref()));
        if let Some(level) = Predicate::and_all(prefix.chain(std::iter::once(strictly_after(term, value)))) {
            levels.push(level);
        }
    }

    Predicate::or_any(levels)
        .ok_or_else(|| BoundaryError::Mismatch("cursor has no primary key".to_string()))
}

//! Filter compiler.
//!
//! Lowers a `FilterExpr` to a `Predicate` against a `PropertyRegistry`.
//! Compilation is depth-first, left to right, and stops at the first
//! error: no partial predicate is ever returned.

use super::ast::{FilterExpr, FilterOp};
use super::errors::{FilterError, FilterResult};
use super::registry::{PropertyDescriptor, PropertyRegistry};
use crate::predicate::{CompareOp, Expr, Predicate};
use crate::value::{Value, ValueType};

/// Compiles a filter expression into a storage predicate
pub fn compile(expr: &FilterExpr, registry: &PropertyRegistry) -> FilterResult<Predicate> {
    match expr {
        FilterExpr::Cmp {
            property,
            op,
            value,
        } => compile_cmp(property, *op, value, registry),
        FilterExpr::And(..) => Ok(Predicate::And(compile_chain(expr, registry)?)),
        FilterExpr::Or(..) => Ok(Predicate::Or(compile_chain(expr, registry)?)),
        FilterExpr::Not(inner) => Ok(compile(inner, registry)?.negate()),
    }
}

/// Compiles the operands of a run of same-kind `And`/`Or` nodes.
///
/// The run is walked with an explicit stack, so a long `a and b and ...`
/// chain costs no recursion depth. Operands come out left to right.
fn compile_chain(root: &FilterExpr, registry: &PropertyRegistry) -> FilterResult<Vec<Predicate>> {
    let mut terms = Vec::new();
    let mut stack = vec![root];
    while let Some(expr) = stack.pop() {
        match split(root, expr) {
            Some((lhs, rhs)) => {
                stack.push(rhs);
                stack.push(lhs);
            }
            None => terms.push(compile(expr, registry)?),
        }
    }
    Ok(terms)
}

/// Operands of `expr` when it is the same connective as `root`
fn split<'a>(root: &FilterExpr, expr: &'a FilterExpr) -> Option<(&'a FilterExpr, &'a FilterExpr)> {
    match (root, expr) {
        (FilterExpr::And(..), FilterExpr::And(lhs, rhs))
        | (FilterExpr::Or(..), FilterExpr::Or(lhs, rhs)) => Some((lhs.as_ref(), rhs.as_ref())),
        _ => None,
    }
}

fn compile_cmp(
    property: &str,
    op: FilterOp,
    value: &Value,
    registry: &PropertyRegistry,
) -> FilterResult<Predicate> {
    let desc = registry
        .get(property)
        .ok_or_else(|| FilterError::UnknownProperty {
            name: property.to_string(),
            available: registry.names(),
        })?;

    if desc.is_array {
        // eq on an array column is a membership test, never element-wise equality
        if !matches!(op, FilterOp::Eq | FilterOp::Has) {
            return Err(FilterError::UnsupportedOperatorForArray {
                property: desc.name.clone(),
                operator: op,
            });
        }
        let value = check_value(desc, value)?;
        return Ok(Predicate::Contains {
            column: desc.column.clone(),
            value,
        });
    }

    let op = match op {
        FilterOp::Eq => CompareOp::Eq,
        FilterOp::Ne => CompareOp::Ne,
        FilterOp::Gt => CompareOp::Gt,
        FilterOp::Ge => CompareOp::Ge,
        FilterOp::Lt => CompareOp::Lt,
        FilterOp::Le => CompareOp::Le,
        FilterOp::Has => {
            return Err(FilterError::UnsupportedOperator {
                property: desc.name.clone(),
                operator: op,
            });
        }
    };
    let value = check_value(desc, value)?;
    Ok(Predicate::compare(Expr::column(&desc.column), op, value))
}

/// Checks a literal against the declared type, normalizing enum members
fn check_value(desc: &PropertyDescriptor, value: &Value) -> FilterResult<Value> {
    if desc.declared_type == ValueType::Enum {
        let text = match value {
            Value::Str(s) | Value::Enum(s) => s,
            other => {
                return Err(FilterError::TypeMismatch {
                    property: desc.name.clone(),
                    expected: ValueType::Enum,
                    got: other.value_type(),
                });
            }
        };
        return desc
            .enum_member(text)
            .map(|member| Value::Enum(member.to_string()))
            .ok_or_else(|| FilterError::InvalidEnumValue {
                property: desc.name.clone(),
                value: text.clone(),
                allowed: desc.enum_values.clone().unwrap_or_default(),
            });
    }

    if value.value_type() != desc.declared_type {
        return Err(FilterError::TypeMismatch {
            property: desc.name.clone(),
            expected: desc.declared_type,
            got: value.value_type(),
        });
    }
    Ok(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parse_filter;

    fn registry() -> PropertyRegistry {
        PropertyRegistry::new(vec![
            PropertyDescriptor::new("year", ValueType::Int),
            PropertyDescriptor::new("rating", ValueType::Float),
            PropertyDescriptor::enumeration("genre", ["action", "drama"]),
            PropertyDescriptor::enumeration("tags", ["anime", "live"])
                .array()
                .with_column("tag_list"),
            PropertyDescriptor::new("airDate", ValueType::Date).with_column("air_date"),
        ])
        .unwrap()
    }

    fn compile_str(filter: &str) -> FilterResult<Predicate> {
        compile(&parse_filter(filter).unwrap(), &registry())
    }

    #[test]
    fn test_compile_conjunction() {
        let pred = compile_str("genre eq action and year gt 2000").unwrap();
        assert_eq!(pred.to_string(), "(genre = 'action') AND (year > 2000)");
    }

    #[test]
    fn test_float_literal_on_int_property() {
        let err = compile_str("year gt 2000.5").unwrap_err();
        assert_eq!(
            err,
            FilterError::TypeMismatch {
                property: "year".into(),
                expected: ValueType::Int,
                got: ValueType::Float,
            }
        );
    }

    #[test]
    fn test_int_literal_on_float_property_is_rejected() {
        let err = compile_str("rating eq 8").unwrap_err();
        assert!(matches!(
            err,
            FilterError::TypeMismatch {
                expected: ValueType::Float,
                got: ValueType::Int,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_property() {
        let err = compile_str("studio eq ghibli").unwrap_err();
        match err {
            FilterError::UnknownProperty { name, available } => {
                assert_eq!(name, "studio");
                assert_eq!(available, vec!["year", "rating", "genre", "tags", "airDate"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_enum_value() {
        let err = compile_str("genre eq comedy").unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidEnumValue {
                property: "genre".into(),
                value: "comedy".into(),
                allowed: vec!["action".into(), "drama".into()],
            }
        );
    }

    #[test]
    fn test_enum_value_case_normalized() {
        let pred = compile_str("Genre eq ACTION").unwrap();
        assert_eq!(pred.to_string(), "genre = 'action'");
    }

    #[test]
    fn test_array_eq_is_membership() {
        let eq = compile_str("tags eq anime").unwrap();
        let has = compile_str("tags has anime").unwrap();
        assert_eq!(eq, has);
        assert_eq!(eq.to_string(), "'anime' = ANY(tag_list)");
    }

    #[test]
    fn test_array_rejects_ordering_operators() {
        let err = compile_str("tags gt anime").unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedOperatorForArray {
                property: "tags".into(),
                operator: FilterOp::Gt,
            }
        );
    }

    #[test]
    fn test_has_on_scalar_rejected() {
        let err = compile_str("year has 3").unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_first_error_wins() {
        let err = compile_str("year gt 1.5 or genre eq comedy").unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { .. }));

        let err = compile_str("genre eq comedy or year gt 1.5").unwrap_err();
        assert!(matches!(err, FilterError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_date_uses_declared_column() {
        let pred = compile_str("not airDate lt 2020-01-01").unwrap();
        assert_eq!(pred.to_string(), "NOT (air_date < '2020-01-01')");
    }

    #[test]
    fn test_date_property_rejects_string() {
        let err = compile_str("airDate lt yesterday").unwrap_err();
        assert!(matches!(
            err,
            FilterError::TypeMismatch {
                expected: ValueType::Date,
                got: ValueType::Str,
                ..
            }
        ));
    }

    #[test]
    fn test_long_chain_compiles_flat() {
        let mut expr = FilterExpr::eq("year", Value::Int(0));
        for i in 1..5000 {
            expr = expr.and(FilterExpr::eq("year", Value::Int(i)));
        }
        match compile(&expr, &registry()).unwrap() {
            Predicate::And(terms) => {
                assert_eq!(terms.len(), 5000);
                assert_eq!(terms[4999].to_string(), "year = 4999");
            }
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_connectives_keep_grouping() {
        let pred = compile_str("(year gt 1 and year lt 3) or genre eq drama or year eq 9").unwrap();
        assert_eq!(
            pred.to_string(),
            "((year > 1) AND (year < 3)) OR (genre = 'drama') OR (year = 9)"
        );
    }
}

//! Engine-agnostic predicates handed to the storage engine.
//!
//! A `Predicate` is the output of filter compilation and keyset boundary
//! construction. It references storage columns (never request-facing
//! property names) and is rendered as SQL-ish text for explain output.

mod eval;

pub use eval::{evaluate, matches, Truth};

use std::fmt;

use crate::value::Value;

/// Scalar comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Returns the SQL symbol for this operator
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }
}

/// A reference to a column or a value derived from one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A plain storage column
    Column(String),
    /// `hash(seed, column)`, the position of a row in a seeded shuffle
    SeededHash { seed: u64, column: String },
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(c) => f.write_str(c),
            Expr::SeededHash { seed, column } => write!(f, "hash({}, {})", seed, column),
        }
    }
}

/// A boolean condition over rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `expr op value`
    Compare {
        expr: Expr,
        op: CompareOp,
        value: Value,
    },
    /// Array membership: `value = ANY(column)`
    Contains { column: String, value: Value },
    /// `expr IS NULL`
    IsNull(Expr),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(expr: Expr, op: CompareOp, value: Value) -> Self {
        Predicate::Compare { expr, op, value }
    }

    pub fn is_null(expr: Expr) -> Self {
        Predicate::IsNull(expr)
    }

    /// Conjunction that flattens nested `And` and collapses single terms.
    ///
    /// An empty conjunction is `None` (no restriction).
    pub fn and_all(parts: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        let mut terms = Vec::new();
        for part in parts {
            match part {
                Predicate::And(inner) => terms.extend(inner),
                other => terms.push(other),
            }
        }
        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Predicate::And(terms)),
        }
    }

    /// Disjunction that flattens nested `Or` and collapses single terms.
    ///
    /// An empty disjunction is `None` (matches nothing).
    pub fn or_any(parts: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        let mut terms = Vec::new();
        for part in parts {
            match part {
                Predicate::Or(inner) => terms.extend(inner),
                other => terms.push(other),
            }
        }
        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Predicate::Or(terms)),
        }
    }

    /// `self AND other`, flattened
    pub fn and(self, other: Predicate) -> Self {
        let mut terms = match self {
            Predicate::And(inner) => inner,
            single => vec![single],
        };
        match other {
            Predicate::And(inner) => terms.extend(inner),
            single => terms.push(single),
        }
        Predicate::And(terms)
    }

    /// `self OR other`, flattened
    pub fn or(self, other: Predicate) -> Self {
        let mut terms = match self {
            Predicate::Or(inner) => inner,
            single => vec![single],
        };
        match other {
            Predicate::Or(inner) => terms.extend(inner),
            single => terms.push(single),
        }
        Predicate::Or(terms)
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { expr, op, value } => {
                write!(f, "{} {} {}", expr, op.symbol(), value)
            }
            Predicate::Contains { column, value } => write!(f, "{} = ANY({})", value, column),
            Predicate::IsNull(expr) => write!(f, "{} IS NULL", expr),
            Predicate::And(terms) => write_joined(f, terms, " AND "),
            Predicate::Or(terms) => write_joined(f, terms, " OR "),
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[Predicate], sep: &str) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "({})", term)?;
    }
    Ok(())
}

//! Keyset boundary construction
//!
//! Turns a decoded cursor into a predicate selecting exactly the rows that
//! sort strictly after the cursor row under the resolved order.
//!
//! # Shape
//!
//! For order terms k0..kn with cursor values c0..cn the boundary is a
//! disjunction of levels. Level i holds when every earlier term equals its
//! cursor value and term i sorts strictly after ci:
//!
//! - `ki > ci` for ascending terms, `ki < ci` for descending ones
//! - `OR ki IS NULL` when ki is nullable, since NULLs sort last
//! - a NULL ci contributes no level of its own; rows tied on NULL fall
//!   through to later levels via `kj IS NULL` equality
//!
//! The primary key is the final level, so the order is total and no row is
//! ever returned twice or skipped.

mod boundary;
mod errors;

pub use boundary::boundary;
pub use errors::{BoundaryError, BoundaryResult};

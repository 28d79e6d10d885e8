//! Filter subsystem
//!
//! Turns the `filter` request parameter into a storage predicate.
//!
//! # Flow
//!
//! 1. `parse_filter` turns text into a `FilterExpr` tree
//! 2. `compile` resolves every property against the endpoint's
//!    `PropertyRegistry`, type-checks every literal and emits a `Predicate`
//!
//! Both steps are pure; the first error stops compilation.

mod ast;
mod compiler;
mod errors;
mod parser;
mod registry;

pub use ast::{FilterExpr, FilterOp};
pub use compiler::compile;
pub use errors::{FilterError, FilterResult};
pub use parser::{parse_filter, MAX_DEPTH, MAX_FILTER_LEN, MAX_TERMS};
pub use registry::{PropertyDescriptor, PropertyRegistry};

use crate::predicate::Predicate;

/// Parses and compiles a filter string in one step
pub fn compile_str(filter: &str, registry: &PropertyRegistry) -> FilterResult<Predicate> {
    compile(&parse_filter(filter)?, registry)
}

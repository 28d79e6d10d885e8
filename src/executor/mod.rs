//! Reference storage engine
//!
//! Runs a resolved list query over rows held in memory.
//!
//! # Execution Flow (strict order)
//!
//! 1. Keep rows for which the predicate is TRUE (three-valued logic)
//! 2. Sort by the ORDER BY terms, NULLS LAST
//! 3. Apply limit
//!
//! A real deployment hands the same predicate and ORDER BY to a database;
//! this engine defines the results such a database must return.

mod table;

pub use table::{MemoryTable, RowSource};

//! catalogq - list-query resolution for catalog APIs
//!
//! Turns the `filter`, `sort`, `after` and `limit` parameters of a list
//! request into an engine-agnostic predicate, a total ORDER BY and a page
//! size, then wraps the returned rows in a `{items, this, next}` envelope
//! whose links resume exactly where the page ended.
//!
//! # Subsystems
//!
//! - `value`: typed literals shared by filters, sorts and cursors
//! - `predicate`: the WHERE clause handed to the storage engine
//! - `filter`: filter-expression parser and type-checking compiler
//! - `sort`: sort tokens, total orders and seeded random order
//! - `cursor`: opaque boundary tokens
//! - `keyset`: boundary predicates for keyset pagination
//! - `page`: response envelope and link building
//! - `endpoint`: per-resource registries, limits and request resolution
//! - `catalog`, `executor`, `config`, `observability`, `cli`: the
//!   surrounding service

pub mod catalog;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod endpoint;
pub mod executor;
pub mod filter;
pub mod keyset;
pub mod observability;
pub mod page;
pub mod predicate;
pub mod sort;
pub mod value;

use serde_json::Value as JsonValue;

use crate::endpoint::ResolvedQuery;
use crate::predicate::{matches, Predicate};
use crate::sort::{compare_rows, OrderTerm};

/// Anything that can answer a resolved list query with rows
pub trait RowSource {
    fn fetch(&self, query: &ResolvedQuery) -> Vec<JsonValue>;
}

/// Rows of one resource, kept in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTable {
    rows: Vec<JsonValue>,
}

impl MemoryTable {
    pub fn new(rows: Vec<JsonValue>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[JsonValue] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn insert(&mut self, row: JsonValue) {
        self.rows.push(row);
    }

    /// Filters, sorts and truncates the rows
    pub fn execute(
        &self,
        predicate: Option<&Predicate>,
        order: &[OrderTerm],
        limit: usize,
    ) -> Vec<JsonValue> {
        let mut selected: Vec<&JsonValue> = self
            .rows
            .iter()
            .filter(|row| predicate.map_or(true, |p| matches(row, p)))
            .collect();
        selected.sort_by(|a, b| compare_rows(a, b, order));
        selected.into_iter().take(limit).cloned().collect()
    }
}

impl RowSource for MemoryTable {
    fn fetch(&self, query: &ResolvedQuery) -> Vec<JsonValue> {
        self.execute(query.predicate().as_ref(), &query.order_by(), query.limit)
    }
}

//! # List Endpoints
//!
//! A `ListEndpoint` bundles what one resource exposes to list requests:
//! its filterable properties, its sortable properties and primary key, and
//! its page-size limits. It is built once at startup; a bad declaration is
//! a `RegistryError` and never reaches request handling.
//!
//! # Request flow
//!
//! 1. `ListParams` reads `filter`, `sort`, `after` and `limit`
//! 2. `ListEndpoint::resolve` compiles the filter, resolves the sort,
//!    decodes the cursor into a boundary and checks the limit
//! 3. The storage engine runs `ResolvedQuery::predicate()` with
//!    `ResolvedQuery::order_by()` and the limit
//! 4. `ListEndpoint::page` wraps the returned rows in a `Page`
//!
//! Every step is pure. The only pagination state is the client-held URL.

mod errors;
mod params;

pub use errors::{ErrorClass, QueryError, QueryResult, RegistryError};
pub use params::ListParams;

use serde::Serialize;
use url::Url;

use crate::cursor;
use crate::filter::{compile_str, PropertyRegistry};
use crate::keyset::boundary;
use crate::page::{self, Page};
use crate::predicate::Predicate;
use crate::sort::{self, fresh_seed, OrderTerm, SortRegistry, SortSpec};

/// Page size used when a request gives none
pub const DEFAULT_LIMIT: usize = 50;

/// Largest page size a request may ask for
pub const MAX_LIMIT: usize = 250;

/// One list resource and everything a request may reference on it
#[derive(Debug, Clone)]
pub struct ListEndpoint {
    name: String,
    filters: PropertyRegistry,
    sorts: SortRegistry,
    default_limit: usize,
    max_limit: usize,
}

impl ListEndpoint {
    pub fn new(name: impl Into<String>, filters: PropertyRegistry, sorts: SortRegistry) -> Self {
        Self {
            name: name.into(),
            filters,
            sorts,
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }

    /// Overrides the page-size limits
    pub fn with_limits(mut self, default_limit: usize, max_limit: usize) -> Result<Self, RegistryError> {
        if max_limit == 0 || default_limit > max_limit {
            return Err(RegistryError::InvalidLimits {
                default_limit,
                max_limit,
            });
        }
        self.default_limit = default_limit;
        self.max_limit = max_limit;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filters(&self) -> &PropertyRegistry {
        &self.filters
    }

    pub fn sorts(&self) -> &SortRegistry {
        &self.sorts
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Resolves request parameters into a query for the storage engine
    pub fn resolve(&self, params: &ListParams) -> QueryResult<ResolvedQuery> {
        self.resolve_with_seed(params, fresh_seed)
    }

    /// Same as `resolve`, drawing an unseeded `random` seed from `seed_source`
    pub fn resolve_with_seed(
        &self,
        params: &ListParams,
        seed_source: impl FnOnce() -> u64,
    ) -> QueryResult<ResolvedQuery> {
        let filter = params
            .filter
            .as_deref()
            .map(|f| compile_str(f, &self.filters))
            .transpose()?;

        let sort = sort::resolve_with_seed(&params.sort, &self.sorts, seed_source)?;
        let limit = self.limit(params.limit.as_deref())?;

        let boundary = match params.after.as_deref() {
            Some(token) => Some(boundary(&cursor::decode(token, &sort)?, &sort)?),
            None => None,
        };

        Ok(ResolvedQuery {
            filter,
            boundary,
            sort,
            limit,
        })
    }

    fn limit(&self, raw: Option<&str>) -> QueryResult<usize> {
        let Some(raw) = raw else {
            return Ok(self.default_limit);
        };
        let limit: usize = raw
            .trim()
            .parse()
            .map_err(|_| QueryError::InvalidLimit(raw.to_string()))?;
        if limit > self.max_limit {
            return Err(QueryError::LimitExceeded {
                limit,
                max: self.max_limit,
            });
        }
        Ok(limit)
    }

    /// Wraps the rows returned for `query` in the list envelope
    pub fn page<T: Serialize>(
        &self,
        items: Vec<T>,
        url: &Url,
        query: &ResolvedQuery,
    ) -> QueryResult<Page<T>> {
        Ok(page::assemble(items, url, &query.sort, query.limit)?)
    }
}

/// A fully validated list query
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub filter: Option<Predicate>,
    pub boundary: Option<Predicate>,
    pub sort: SortSpec,
    pub limit: usize,
}

impl ResolvedQuery {
    /// The WHERE clause: filter AND boundary, or `None` for all rows
    pub fn predicate(&self) -> Option<Predicate> {
        Predicate::and_all(self.filter.iter().chain(self.boundary.iter()).cloned())
    }

    pub fn order_by(&self) -> Vec<OrderTerm> {
        self.sort.order_by()
    }

    pub fn explain(&self) -> Explain {
        Explain {
            predicate: self.predicate().map(|p| p.to_string()),
            order_by: self.order_by().iter().map(ToString::to_string).collect(),
            sort: self.sort.tokens(),
            limit: self.limit,
        }
    }
}

/// Human-readable rendering of a resolved query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explain {
    pub predicate: Option<String>,
    pub order_by: Vec<String>,
    /// Tokens that reproduce the resolved sort
    pub sort: Vec<String>,
    pub limit: usize,
}

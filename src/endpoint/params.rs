//! # List Query Parameters
//!
//! Reads the wire parameters of a list request:
//! - `filter`: filter expression
//! - `sort`: repeatable sort token
//! - `after`: opaque cursor
//! - `limit`: page size
//!
//! Other parameters belong to the HTTP layer and are ignored.

use url::Url;

use super::errors::{QueryError, QueryResult};

/// Raw list parameters, before resolution against an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub filter: Option<String>,
    pub sort: Vec<String>,
    pub after: Option<String>,
    pub limit: Option<String>,
}

fn set_once(slot: &mut Option<String>, name: &str, value: &str) -> QueryResult<()> {
    if value.is_empty() {
        return Ok(());
    }
    if slot.is_some() {
        return Err(QueryError::InvalidParameter {
            name: name.to_string(),
            reason: "given more than once".to_string(),
        });
    }
    *slot = Some(value.to_string());
    Ok(())
}

impl ListParams {
    /// Collects parameters from decoded key/value pairs.
    ///
    /// Empty values count as absent. `filter`, `after` and `limit` may
    /// appear at most once.
    pub fn from_pairs<I, K, V>(pairs: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "filter" => set_once(&mut params.filter, "filter", value)?,
                "after" => set_once(&mut params.after, "after", value)?,
                "limit" => set_once(&mut params.limit, "limit", value)?,
                "sort" if !value.is_empty() => params.sort.push(value.to_string()),
                _ => {}
            }
        }
        Ok(params)
    }

    /// Collects parameters from a request URL's query string
    pub fn from_url(url: &Url) -> QueryResult<Self> {
        Self::from_pairs(url.query_pairs())
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort(mut self, token: impl Into<String>) -> Self {
        self.sort.push(token.into());
        self
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.to_string());
        self
    }
}

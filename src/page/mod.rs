//! # Page Assembly
//!
//! Wraps one page of rows in the list envelope:
//!
//! ```json
//! { "items": [...], "this": "<uri>", "next": "<uri>" | null }
//! ```
//!
//! `this` replays the current page. For a random sort it is rewritten to
//! pin `sort=random:<seed>`, so replaying it returns the same items in the
//! same order. `next` carries an `after` cursor built from the last item and
//! is present only when the page is full. A full last page therefore still
//! links to a following page that turns out empty; no existence check is
//! made.

use serde::Serialize;
use url::Url;

use crate::cursor::{self, CursorError, CursorResult};
use crate::sort::SortSpec;

pub const SORT_PARAM: &str = "sort";
pub const AFTER_PARAM: &str = "after";

/// List response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub this: String,
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Returns `url` with every `key` parameter replaced by a single `key=value`
pub fn replace_param(url: &Url, key: &str, value: &str) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut out = url.clone();
    out.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(key, value);
    out
}

/// Builds the envelope for `items` fetched with `spec` and `limit`.
///
/// Performs no query; fails only if the last row cannot produce a cursor.
pub fn assemble<T: Serialize>(
    items: Vec<T>,
    url: &Url,
    spec: &SortSpec,
    limit: usize,
) -> CursorResult<Page<T>> {
    let this = match spec.random_seed() {
        Some(seed) => replace_param(url, SORT_PARAM, &format!("random:{}", seed)),
        None => url.clone(),
    };

    let next = match items.last() {
        Some(last) if limit > 0 && items.len() == limit => {
            let row = serde_json::to_value(last).map_err(|e| CursorError::UnreadableRow {
                reason: e.to_string(),
            })?;
            let token = cursor::encode(&row, spec)?;
            Some(replace_param(&this, AFTER_PARAM, &token).to_string())
        }
        _ => None,
    };

    Ok(Page {
        items,
        this: this.to_string(),
        next,
    })
}

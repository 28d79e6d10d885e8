//! Keyset pagination tests
//!
//! Following `next` links from the first page must visit exactly the rows
//! of the full ordered result, once each, for any mix of directions and
//! nullable keys.

use std::collections::HashSet;

use catalogq::cursor;
use catalogq::endpoint::{ListEndpoint, ListParams};
use catalogq::executor::{MemoryTable, RowSource};
use catalogq::filter::{PropertyDescriptor, PropertyRegistry};
use catalogq::sort::{compare_rows, SortRegistry, SortableDescriptor};
use catalogq::value::ValueType;
use proptest::prelude::*;
use serde_json::{json, Value};
use url::Url;

// =============================================================================
// Fixtures
// =============================================================================

fn endpoint() -> ListEndpoint {
    let filters = PropertyRegistry::new(vec![
        PropertyDescriptor::new("year", ValueType::Int),
        PropertyDescriptor::new("rating", ValueType::Float),
        PropertyDescriptor::new("name", ValueType::Str),
    ])
    .unwrap();
    let sorts = SortRegistry::new(
        vec![
            SortableDescriptor::new("rating", ValueType::Float).nullable(),
            SortableDescriptor::new("year", ValueType::Int),
            SortableDescriptor::new("name", ValueType::Str),
            SortableDescriptor::new("airDate", ValueType::Date)
                .with_column("air_date")
                .nullable(),
        ],
        SortableDescriptor::new("id", ValueType::Int),
    )
    .unwrap();
    ListEndpoint::new("shows", filters, sorts)
        .with_limits(3, 100)
        .unwrap()
}

fn ids(rows: &[Value]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

/// Follows `next` links from `first` until the last page
fn walk(endpoint: &ListEndpoint, table: &MemoryTable, first: &str) -> Vec<i64> {
    let mut seen = Vec::new();
    let mut link = Some(first.to_string());
    let mut pages = 0;
    while let Some(current) = link {
        pages += 1;
        assert!(pages <= table.len() + 2, "pagination did not terminate");

        let url = Url::parse(&current).unwrap();
        let query = endpoint.resolve(&ListParams::from_url(&url).unwrap()).unwrap();
        let rows = table.fetch(&query);
        let page = endpoint.page(rows, &url, &query).unwrap();
        seen.extend(ids(&page.items));
        link = page.next;
    }
    seen
}

/// The whole ordered result in one go
fn full(endpoint: &ListEndpoint, table: &MemoryTable, query_string: &str) -> Vec<i64> {
    let url = Url::parse(&format!("http://x/shows?{}", query_string)).unwrap();
    let mut params = ListParams::from_url(&url).unwrap();
    params.limit = None;
    let query = endpoint.resolve(&params).unwrap();
    ids(&table.execute(query.predicate().as_ref(), &query.order_by(), usize::MAX))
}

fn shows() -> MemoryTable {
    MemoryTable::new(vec![
        json!({"id": 1, "rating": 7.5, "year": 2001, "name": "b", "air_date": "2001-03-01"}),
        json!({"id": 2, "rating": null, "year": 2003, "name": "a", "air_date": null}),
        json!({"id": 3, "rating": 9.0, "year": 2001, "name": "c", "air_date": "2001-01-01"}),
        json!({"id": 4, "rating": 7.5, "year": 2000, "name": "a", "air_date": "1999-12-31"}),
        json!({"id": 5, "rating": 8.0, "year": 2003, "name": "b"}),
    ])
}

// =============================================================================
// NULLS LAST
// =============================================================================

#[test]
fn test_null_rating_sorts_last_when_descending() {
    let ep = endpoint();
    let table = shows();
    let all = full(&ep, &table, "sort=-rating&sort=year");
    assert_eq!(all, vec![3, 5, 4, 1, 2]);
    assert_eq!(walk(&ep, &table, "http://x/shows?sort=-rating&sort=year"), all);
}

#[test]
fn test_null_rating_sorts_last_when_ascending() {
    let ep = endpoint();
    let table = shows();
    let all = full(&ep, &table, "sort=rating");
    assert_eq!(all, vec![1, 4, 5, 3, 2]);
    assert_eq!(walk(&ep, &table, "http://x/shows?sort=rating&limit=1"), all);
}

#[test]
fn test_page_boundary_on_null_row() {
    // some limits end a page on a NULL air date with another NULL still to come
    let ep = endpoint();
    let table = shows();
    let all = full(&ep, &table, "sort=-airDate");
    assert_eq!(all, vec![1, 3, 4, 2, 5]);
    for limit in 1..=5 {
        let first = format!("http://x/shows?sort=-airDate&limit={}", limit);
        assert_eq!(walk(&ep, &table, &first), all, "limit {}", limit);
    }
}

// =============================================================================
// MIXED DIRECTIONS AND FILTERS
// =============================================================================

#[test]
fn test_mixed_directions() {
    let ep = endpoint();
    let table = shows();
    let all = full(&ep, &table, "sort=year&sort=-name");
    assert_eq!(all, vec![4, 3, 1, 5, 2]);
    assert_eq!(walk(&ep, &table, "http://x/shows?sort=year,-name&limit=2"), all);
}

#[test]
fn test_filter_is_kept_across_pages() {
    let ep = endpoint();
    let table = shows();
    let all = full(&ep, &table, "filter=year%20ge%202001&sort=name");
    assert_eq!(all, vec![2, 1, 5, 3]);
    assert_eq!(
        walk(&ep, &table, "http://x/shows?filter=year%20ge%202001&sort=name&limit=1"),
        all
    );
}

#[test]
fn test_exact_multiple_of_limit_ends_with_empty_page() {
    let ep = endpoint();
    let table = MemoryTable::new(vec![json!({"id": 1, "year": 1}), json!({"id": 2, "year": 2})]);

    let url = Url::parse("http://x/shows?sort=year&limit=2").unwrap();
    let query = ep.resolve(&ListParams::from_url(&url).unwrap()).unwrap();
    let page = ep.page(table.fetch(&query), &url, &query).unwrap();
    let next = Url::parse(&page.next.unwrap()).unwrap();

    let query = ep.resolve(&ListParams::from_url(&next).unwrap()).unwrap();
    let page = ep.page(table.fetch(&query), &next, &query).unwrap();
    assert!(page.items.is_empty());
    assert!(page.next.is_none());
}

// =============================================================================
// PROPERTIES
// =============================================================================

fn row_strategy() -> impl Strategy<Value = (Option<u8>, u8, u8, Option<u8>)> {
    (
        proptest::option::of(0u8..4),
        0u8..3,
        0u8..3,
        proptest::option::of(1u8..4),
    )
}

fn build_rows(specs: &[(Option<u8>, u8, u8, Option<u8>)]) -> Vec<Value> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (rating, year, name, day))| {
            json!({
                "id": i as i64 + 1,
                "rating": rating.map(|r| f64::from(r) / 2.0),
                "year": 2000 + i64::from(*year),
                "name": (["a", "b", "c"][*name as usize]),
                "air_date": day.map(|d| format!("2020-01-0{}", d)),
            })
        })
        .collect()
}

fn sort_tokens() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec((0usize..4, any::<bool>()), 0..4).prop_map(|keys| {
        keys.into_iter()
            .map(|(k, desc)| {
                let name = ["rating", "year", "name", "airDate"][k];
                if desc {
                    format!("-{}", name)
                } else {
                    name.to_string()
                }
            })
            .collect()
    })
}

proptest! {
    /// Walking every page yields the full order, each row exactly once.
    #[test]
    fn keyset_walk_matches_full_order(
        specs in proptest::collection::vec(row_strategy(), 0..24),
        tokens in sort_tokens(),
        limit in 1usize..5,
    ) {
        let ep = endpoint();
        let table = MemoryTable::new(build_rows(&specs));

        let mut query_string: Vec<String> = tokens.iter().map(|t| format!("sort={}", t)).collect();
        query_string.push(format!("limit={}", limit));
        let query_string = query_string.join("&");

        let all = full(&ep, &table, &query_string);
        let walked = walk(&ep, &table, &format!("http://x/shows?{}", query_string));

        let unique: HashSet<i64> = walked.iter().copied().collect();
        prop_assert_eq!(unique.len(), walked.len());
        prop_assert_eq!(walked, all);
    }

    /// No two distinct rows compare equal under a resolved order.
    #[test]
    fn resolved_order_is_total(
        specs in proptest::collection::vec(row_strategy(), 2..12),
        tokens in sort_tokens(),
    ) {
        let ep = endpoint();
        let rows = build_rows(&specs);
        let params = ListParams { sort: tokens, ..Default::default() };
        let order = ep.resolve(&params).unwrap().order_by();
        for (i, a) in rows.iter().enumerate() {
            for b in rows.iter().skip(i + 1) {
                prop_assert_ne!(compare_rows(a, b, &order), std::cmp::Ordering::Equal);
            }
        }
    }

    /// A cursor decodes to exactly the values read off its row.
    #[test]
    fn cursor_round_trip(
        spec in row_strategy(),
        tokens in sort_tokens(),
    ) {
        let ep = endpoint();
        let row = build_rows(&[spec]).remove(0);
        let params = ListParams { sort: tokens, ..Default::default() };
        let sort = ep.resolve(&params).unwrap().sort;

        let token = cursor::encode(&row, &sort).unwrap();
        prop_assert_eq!(cursor::decode(&token, &sort).unwrap(), cursor::extract(&row, &sort).unwrap());
    }

    /// Arbitrary text never panics the decoder.
    #[test]
    fn cursor_decode_is_total(token in "\\PC{0,64}") {
        let ep = endpoint();
        let params = ListParams { sort: vec!["-rating".into()], ..Default::default() };
        let sort = ep.resolve(&params).unwrap().sort;
        let _ = cursor::decode(&token, &sort);
    }
}

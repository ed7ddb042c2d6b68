//! Paging and sort translation tests.

use std::collections::HashSet;

use serde_json::json;

use msr_search::paging::{
    DtPage, PagingRequest, SortDirection, SortKind, to_index_sort, to_page_spec,
    to_relational_sort,
};
use msr_search::{CompiledListing, PagingError, SearchConfig};

fn paging(value: serde_json::Value) -> PagingRequest {
    serde_json::from_value(value).expect("Failed to deserialize paging request")
}

fn instance_listing() -> PagingRequest {
    paging(json!({
        "draw": 3,
        "start": 20,
        "length": 10,
        "columns": [
            {"data": "id", "searchable": false, "orderable": true},
            {"data": "name", "searchable": true, "orderable": true},
            {"data": "lastUpdatedAt", "searchable": false, "orderable": true}
        ],
        "order": [{"column": 0, "dir": "desc"}],
        "search": {"value": "NavWarn", "regex": false}
    }))
}

// ============================================================================
// Page Tests
// ============================================================================

#[test]
fn test_page_spec() {
    let page = to_page_spec(&instance_listing()).unwrap();
    assert_eq!(page.page_number, 2);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.offset(), 20);
}

#[test]
fn test_zero_length() {
    let mut request = instance_listing();
    request.length = 0;
    assert_eq!(
        to_page_spec(&request).unwrap_err(),
        PagingError::InvalidPageLength { length: 0 }
    );
}

// ============================================================================
// Sort Tests
// ============================================================================

#[test]
fn test_redirected_numeric_sort() {
    let redirects: HashSet<String> = ["id".to_string()].into_iter().collect();
    let sort = to_index_sort(&instance_listing(), &redirects).unwrap();

    assert_eq!(sort.fields().len(), 1);
    assert_eq!(sort.fields()[0].field, "id_sort");
    assert_eq!(sort.fields()[0].kind, SortKind::Numeric);
    assert!(sort.fields()[0].reverse());
}

#[test]
fn test_without_redirects_sort_is_lexical() {
    let sort = to_index_sort(&instance_listing(), &HashSet::new()).unwrap();
    assert_eq!(sort.fields()[0].field, "id");
    assert_eq!(sort.fields()[0].kind, SortKind::Lexical);
    assert_eq!(sort.fields()[0].direction, SortDirection::Descending);
}

#[test]
fn test_relational_sort_uses_logical_field() {
    let sort = to_relational_sort(&instance_listing()).unwrap();
    assert_eq!(sort.terms()[0].field, "id");
    assert_eq!(sort.to_order_by(), "ORDER BY \"id\" DESC");
}

#[test]
fn test_order_column_out_of_range() {
    let mut request = instance_listing();
    request.order[0].column = 3;
    assert_eq!(
        to_relational_sort(&request).unwrap_err(),
        PagingError::ColumnOutOfRange {
            column: 3,
            columns: 3
        }
    );
}

// ============================================================================
// Listing Tests
// ============================================================================

#[test]
fn test_compiled_listing_with_default_config() {
    let listing = CompiledListing::compile(&instance_listing(), &SearchConfig::default()).unwrap();

    assert_eq!(listing.wildcard.pattern, "navwarn*");
    assert!(listing.wildcard.fields.contains(&"organizationId".to_string()));
    assert_eq!(listing.index_sort.fields()[0].field, "id_sort");
    assert_eq!(listing.page.page_number, 2);
    assert_eq!(listing.draw, 3);
}

#[test]
fn test_response_envelope() {
    let request = instance_listing();
    let page = DtPage::new(&request, vec![json!({"name": "NW"})], 31);
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!({
            "data": [{"name": "NW"}],
            "recordsFiltered": 31,
            "recordsTotal": 31,
            "draw": 3
        })
    );
}

//! Sort translation for the relational store and the full-text index.

use std::collections::HashSet;

use serde::Serialize;
use tracing::trace;

use super::{PagingRequest, SortDirection};
use crate::error::PagingResult;

/// Suffix of the companion field a redirected field is sorted under.
pub const SORT_FIELD_SUFFIX: &str = "_sort";

/// Sort fields that hold 64-bit integers or timestamps in the index.
const NUMERIC_SORT_FIELDS: [&str; 3] = ["id_sort", "publishedAt_sort", "lastUpdatedAt_sort"];

/// A relational sort term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortTerm {
    /// Column field name.
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered sort terms for the relational store; later terms break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelationalSort(Vec<SortTerm>);

impl RelationalSort {
    /// Returns the sort terms.
    pub fn terms(&self) -> &[SortTerm] {
        &self.0
    }

    /// Returns true when no ordering was requested.
    pub fn is_unsorted(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders an SQL `ORDER BY` clause, or an empty string when unsorted.
    ///
    /// Field names are double-quoted with embedded quotes doubled.
    pub fn to_order_by(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = self
            .0
            .iter()
            .map(|term| {
                let order = match term.direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                format!("\"{}\" {}", term.field.replace('"', "\"\""), order)
            })
            .collect();
        format!("ORDER BY {}", terms.join(", "))
    }
}

/// How the index compares values of a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// Sorted numeric doc values (64-bit integer).
    Numeric,
    /// Sorted set doc values (lexical).
    Lexical,
}

/// A sort field of the full-text index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSortField {
    /// Physical field name, after redirection.
    pub field: String,
    /// Numeric or lexical comparison.
    pub kind: SortKind,
    /// Requested direction.
    pub direction: SortDirection,
}

impl IndexSortField {
    /// Returns true when the index should reverse the natural order.
    pub fn reverse(&self) -> bool {
        self.direction.is_descending()
    }
}

/// Ordered sort fields for the full-text index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IndexSort(Vec<IndexSortField>);

impl IndexSort {
    /// Returns the sort fields.
    pub fn fields(&self) -> &[IndexSortField] {
        &self.0
    }

    /// Returns true when no ordering was requested.
    pub fn is_unsorted(&self) -> bool {
        self.0.is_empty()
    }
}

/// Translates the ordering instructions into a relational sort.
pub fn to_relational_sort(request: &PagingRequest) -> PagingResult<RelationalSort> {
    let terms = request
        .ordered_fields()?
        .into_iter()
        .map(|(field, direction)| SortTerm {
            field: field.to_string(),
            direction,
        })
        .collect();
    Ok(RelationalSort(terms))
}

/// Translates the ordering instructions into an index sort.
///
/// A field listed in `redirects` is sorted under `<field>_sort`. The physical
/// fields `id_sort`, `publishedAt_sort` and `lastUpdatedAt_sort` sort
/// numerically; everything else sorts lexically.
pub fn to_index_sort(
    request: &PagingRequest,
    redirects: &HashSet<String>,
) -> PagingResult<IndexSort> {
    let fields = request
        .ordered_fields()?
        .into_iter()
        .map(|(logical, direction)| {
            let field = if redirects.contains(logical) {
                format!("{logical}{SORT_FIELD_SUFFIX}")
            } else {
                logical.to_string()
            };
            let kind = if NUMERIC_SORT_FIELDS.contains(&field.as_str()) {
                SortKind::Numeric
            } else {
                SortKind::Lexical
            };
            trace!(logical, physical = %field, ?kind, "Resolved index sort field");
            IndexSortField {
                field,
                kind,
                direction,
            }
        })
        .collect();
    Ok(IndexSort(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PagingError;
    use crate::paging::{DtColumn, DtOrder};

    fn request(order: Vec<DtOrder>) -> PagingRequest {
        PagingRequest {
            start: 0,
            length: 10,
            columns: vec![
                DtColumn::new("id"),
                DtColumn::new("name"),
                DtColumn::new("publishedAt"),
                DtColumn::new("lastUpdatedAt"),
            ],
            order,
            ..Default::default()
        }
    }

    fn redirects(fields: &[&str]) -> HashSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_relational_sort_keeps_instruction_order() {
        let sort = to_relational_sort(&request(vec![
            DtOrder::new(1, SortDirection::Ascending),
            DtOrder::new(0, SortDirection::Descending),
        ]))
        .unwrap();

        assert_eq!(
            sort.terms(),
            &[
                SortTerm {
                    field: "name".to_string(),
                    direction: SortDirection::Ascending
                },
                SortTerm {
                    field: "id".to_string(),
                    direction: SortDirection::Descending
                },
            ]
        );
    }

    #[test]
    fn test_relational_sort_out_of_range() {
        let err = to_relational_sort(&request(vec![DtOrder::new(7, SortDirection::Ascending)]))
            .unwrap_err();
        assert_eq!(
            err,
            PagingError::ColumnOutOfRange {
                column: 7,
                columns: 4
            }
        );
    }

    #[test]
    fn test_unsorted_request() {
        let sort = to_relational_sort(&request(vec![])).unwrap();
        assert!(sort.is_unsorted());
        assert_eq!(sort.to_order_by(), "");
    }

    #[test]
    fn test_order_by_clause() {
        let sort = to_relational_sort(&request(vec![
            DtOrder::new(3, SortDirection::Descending),
            DtOrder::new(1, SortDirection::Ascending),
        ]))
        .unwrap();
        assert_eq!(
            sort.to_order_by(),
            "ORDER BY \"lastUpdatedAt\" DESC, \"name\" ASC"
        );
    }

    #[test]
    fn test_redirected_id_sorts_numerically() {
        let sort = to_index_sort(
            &request(vec![DtOrder::new(0, SortDirection::Descending)]),
            &redirects(&["id"]),
        )
        .unwrap();

        let field = &sort.fields()[0];
        assert_eq!(field.field, "id_sort");
        assert_eq!(field.kind, SortKind::Numeric);
        assert_eq!(field.direction, SortDirection::Descending);
        assert!(field.reverse());
    }

    #[test]
    fn test_unredirected_id_sorts_lexically() {
        let sort = to_index_sort(
            &request(vec![DtOrder::new(0, SortDirection::Descending)]),
            &HashSet::new(),
        )
        .unwrap();

        let field = &sort.fields()[0];
        assert_eq!(field.field, "id");
        assert_eq!(field.kind, SortKind::Lexical);
    }

    #[test]
    fn test_redirected_text_field_sorts_lexically() {
        let sort = to_index_sort(
            &request(vec![
                DtOrder::new(1, SortDirection::Ascending),
                DtOrder::new(2, SortDirection::Ascending),
                DtOrder::new(3, SortDirection::Descending),
            ]),
            &redirects(&["name", "publishedAt", "lastUpdatedAt"]),
        )
        .unwrap();

        let fields: Vec<(&str, SortKind)> = sort
            .fields()
            .iter()
            .map(|f| (f.field.as_str(), f.kind))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("name_sort", SortKind::Lexical),
                ("publishedAt_sort", SortKind::Numeric),
                ("lastUpdatedAt_sort", SortKind::Numeric),
            ]
        );
    }

    #[test]
    fn test_index_sort_out_of_range() {
        let result = to_index_sort(
            &request(vec![DtOrder::new(4, SortDirection::Ascending)]),
            &redirects(&["id"]),
        );
        assert!(matches!(
            result,
            Err(PagingError::ColumnOutOfRange { column: 4, .. })
        ));
    }

    #[test]
    fn test_index_sort_serializes() {
        let sort = to_index_sort(
            &request(vec![DtOrder::new(0, SortDirection::Ascending)]),
            &redirects(&["id"]),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&sort).unwrap(),
            serde_json::json!([{"field": "id_sort", "kind": "numeric", "direction": "asc"}])
        );
    }
}

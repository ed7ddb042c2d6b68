//! Datatables paging requests and their translation.
//!
//! The registry's listing views use the datatables paging contract: a start
//! offset, a page length, column definitions and ordering instructions that
//! refer to columns by index. This module translates such a request into:
//!
//! - a [`RelationalSort`] for the relational store ([`to_relational_sort`])
//! - an [`IndexSort`] for the full-text index ([`to_index_sort`]), where some
//!   fields are sorted under a separate `<field>_sort` name
//! - a [`PageSpec`] of page number, size and sort ([`to_page_spec`])
//!
//! Results go back to the table as a [`DtPage`].
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use msr_search::paging::{to_index_sort, to_page_spec, DtColumn, DtOrder, PagingRequest, SortDirection, SortKind};
//!
//! let request = PagingRequest {
//!     start: 20,
//!     length: 10,
//!     draw: 3,
//!     columns: vec![DtColumn::new("id"), DtColumn::new("name")],
//!     order: vec![DtOrder::new(0, SortDirection::Descending)],
//!     search: None,
//! };
//!
//! let page = to_page_spec(&request).unwrap();
//! assert_eq!((page.page_number, page.page_size), (2, 10));
//!
//! let redirects: HashSet<String> = ["id".to_string()].into_iter().collect();
//! let sort = to_index_sort(&request, &redirects).unwrap();
//! assert_eq!(sort.fields()[0].field, "id_sort");
//! assert_eq!(sort.fields()[0].kind, SortKind::Numeric);
//! ```

mod page;
mod sort;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PagingError, PagingResult};

pub use page::{DtPage, PageSpec, to_page_spec};
pub use sort::{
    IndexSort, IndexSortField, RelationalSort, SortKind, SortTerm, to_index_sort,
    to_relational_sort,
};

/// Sort direction of an ordering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Descending order.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns true for descending order.
    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// A datatables column definition.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtColumn {
    /// The field the column displays; used as the sort field.
    pub data: String,
    /// Display name; unused by translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderable: Option<bool>,
    /// Per-column search value; unused by translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<DtSearch>,
}

impl DtColumn {
    /// Creates a column for a field.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }
}

/// A datatables ordering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtOrder {
    /// Index into the request's column list.
    pub column: usize,
    /// Sort direction.
    pub dir: SortDirection,
}

impl DtOrder {
    /// Creates an ordering instruction.
    pub fn new(column: usize, dir: SortDirection) -> Self {
        Self { column, dir }
    }
}

/// A datatables search value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtSearch {
    /// The search text.
    #[serde(default)]
    pub value: Option<String>,
    /// Whether the client asked for a regular expression search; ignored.
    #[serde(default)]
    pub regex: Option<bool>,
}

/// A datatables paging request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingRequest {
    /// Offset of the first record.
    pub start: u32,
    /// Number of records per page.
    pub length: u32,
    /// Request counter echoed back in the response.
    pub draw: u32,
    /// Ordering instructions, most significant first.
    pub order: Vec<DtOrder>,
    /// Column definitions referenced by the ordering instructions.
    pub columns: Vec<DtColumn>,
    /// Global search value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<DtSearch>,
}

impl PagingRequest {
    /// Returns the global search value, if any.
    pub fn search_value(&self) -> Option<&str> {
        self.search.as_ref().and_then(|s| s.value.as_deref())
    }

    /// Resolves every ordering instruction to its column's field name.
    ///
    /// Fails on the first instruction whose column index is out of range.
    pub fn ordered_fields(&self) -> PagingResult<Vec<(&str, SortDirection)>> {
        self.order
            .iter()
            .map(|order| {
                self.columns
                    .get(order.column)
                    .map(|column| (column.data.as_str(), order.dir))
                    .ok_or(PagingError::ColumnOutOfRange {
                        column: order.column,
                        columns: self.columns.len(),
                    })
            })
            .collect()
    }
}

//! Page specifications and the datatables response envelope.

use serde::{Deserialize, Serialize};

use super::{PagingRequest, RelationalSort, to_relational_sort};
use crate::error::{PagingError, PagingResult};

/// A zero-based page request for the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    /// Zero-based page index.
    pub page_number: u32,
    /// Records per page; never zero.
    pub page_size: u32,
    /// Relational sort of the page.
    pub sort: RelationalSort,
}

impl PageSpec {
    /// Returns the offset of the page's first record.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

/// Translates a paging request into a page specification.
///
/// The page number is `start / length`, so a `start` that is not a multiple
/// of `length` lands on the page containing it.
pub fn to_page_spec(request: &PagingRequest) -> PagingResult<PageSpec> {
    if request.length == 0 {
        return Err(PagingError::InvalidPageLength {
            length: request.length,
        });
    }
    Ok(PageSpec {
        page_number: request.start / request.length,
        page_size: request.length,
        sort: to_relational_sort(request)?,
    })
}

/// A page of results in the shape the datatables client expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtPage<T> {
    /// The records of this page.
    pub data: Vec<T>,
    /// Number of records matching the search.
    pub records_filtered: u64,
    /// Number of records before filtering.
    pub records_total: u64,
    /// The request's `draw` counter.
    pub draw: u32,
}

impl<T> DtPage<T> {
    /// Creates a page answering `request`.
    ///
    /// Without a separate unfiltered count, both totals are the match count.
    pub fn new(request: &PagingRequest, data: Vec<T>, total: u64) -> Self {
        Self {
            data,
            records_filtered: total,
            records_total: total,
            draw: request.draw,
        }
    }

    /// Creates an empty page answering `request`.
    pub fn empty(request: &PagingRequest) -> Self {
        Self::new(request, Vec::new(), 0)
    }

    /// Sets the unfiltered record count.
    pub fn with_records_total(mut self, total: u64) -> Self {
        self.records_total = total;
        self
    }

    /// Maps the records to a different type.
    pub fn map<U, F>(self, f: F) -> DtPage<U>
    where
        F: FnMut(T) -> U,
    {
        DtPage {
            data: self.data.into_iter().map(f).collect(),
            records_filtered: self.records_filtered,
            records_total: self.records_total,
            draw: self.draw,
        }
    }
}

//! Request and response documents of the command-line driver.

use msr_search::{
    CompiledListing, CompiledSearch, PagingRequest, SearchConfig, SearchFilter, SearchResult,
    to_relational_sort,
};
use serde::{Deserialize, Serialize};

/// A search request document read from a file or stdin.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestDocument {
    /// Service search filter.
    #[serde(default)]
    pub filter: Option<SearchFilter>,
    /// Datatables listing request.
    #[serde(default)]
    pub paging: Option<PagingRequest>,
}

impl RequestDocument {
    /// Returns true when the document asks for nothing.
    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.paging.is_none()
    }
}

/// The compiled listing together with its SQL ordering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingOutput {
    #[serde(flatten)]
    pub listing: CompiledListing,
    /// `ORDER BY` clause for the relational store.
    pub order_by: String,
}

/// The compiled result written to stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<CompiledSearch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<ListingOutput>,
}

/// Compiles every member of a request document.
pub fn compile_document(
    document: &RequestDocument,
    config: &SearchConfig,
) -> SearchResult<ResponseDocument> {
    let search = document
        .filter
        .as_ref()
        .map(CompiledSearch::compile)
        .transpose()?;

    let listing = match &document.paging {
        Some(paging) => {
            let listing = CompiledListing::compile(paging, config)?;
            let order_by = to_relational_sort(paging)?.to_order_by();
            Some(ListingOutput { listing, order_by })
        }
        None => None,
    };

    Ok(ResponseDocument { search, listing })
}

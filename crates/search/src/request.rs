//! Whole-request compilation.
//!
//! A search request and a listing request each combine several of the
//! translations in this crate. [`CompiledSearch`] is what the service search
//! endpoint hands to the index: query text plus an optional geometry
//! constraint. [`CompiledListing`] is what a datatables listing view needs:
//! the wildcard query, the index sort and the page to fetch.

use serde::Serialize;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::SearchResult;
use crate::filter::{SearchFilter, WildcardQuery, compile, compile_wildcard};
use crate::geometry::{Geometry, resolve_geometry};
use crate::paging::{IndexSort, PageSpec, PagingRequest, to_index_sort, to_page_spec};

/// A compiled service search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSearch {
    /// Query text for the full-text index.
    pub query: String,
    /// Geometry the matches must intersect, if constrained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl CompiledSearch {
    /// Compiles a search filter.
    ///
    /// Fails only when the filter carries a geometry that cannot be read.
    pub fn compile(filter: &SearchFilter) -> SearchResult<Self> {
        let query = compile(filter);
        let geometry = resolve_geometry(filter.geometry.as_deref())?;
        debug!(
            freetext = filter.is_freetext(),
            query_len = query.len(),
            has_geometry = geometry.is_some(),
            "Compiled search request"
        );
        Ok(Self { query, geometry })
    }

    /// Returns true when the request matches every document.
    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty() && self.geometry.is_none()
    }
}

/// A compiled datatables listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledListing {
    /// Wildcard query for the global search value.
    pub wildcard: WildcardQuery,
    /// Index sort with redirected fields.
    pub index_sort: IndexSort,
    /// Page to fetch, after length normalization.
    pub page: PageSpec,
    /// The request's `draw` counter, for the response envelope.
    pub draw: u32,
}

impl CompiledListing {
    /// Compiles a paging request.
    ///
    /// A length of 0 is replaced by the configured default page size and
    /// longer pages are clamped to the configured maximum before the page
    /// is computed.
    pub fn compile(paging: &PagingRequest, config: &SearchConfig) -> SearchResult<Self> {
        let length = config.page_length(paging.length);
        if length != paging.length {
            debug!(
                requested = paging.length,
                length, "Adjusted listing page length"
            );
        }
        let normalized = PagingRequest {
            length,
            ..paging.clone()
        };

        let wildcard = compile_wildcard(normalized.search_value(), &config.search_fields());
        let index_sort = to_index_sort(&normalized, &config.redirect_fields())?;
        let page = to_page_spec(&normalized)?;
        Ok(Self {
            wildcard,
            index_sort,
            page,
            draw: normalized.draw,
        })
    }
}

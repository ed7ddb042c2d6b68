//! Maritime Service Registry search core
//!
//! This crate turns the search inputs of the service registry into what the
//! registry's stores understand. It has no I/O of its own: every operation is a
//! pure transformation of a request value.
//!
//! # Features
//!
//! - **Query compilation**: structured search filters become boolean
//!   `field:value` queries for the full-text index, with MMSI/IMO widening
//!   and keyword narrowing groups
//! - **Geometry resolution**: a geometry filter in GeoJSON or WKT (with EWKT
//!   `SRID=` prefix) resolves to one canonical [`Geometry`]
//! - **Sort translation**: datatables paging requests become relational
//!   sorts, index sorts with `<field>_sort` redirection, and page specs
//!
//! # Architecture
//!
//! - [`error`] - Error types for all operations
//! - [`geometry`] - Canonical geometry model and the format resolver
//! - [`filter`] - Search filter model, query compiler and wildcard search
//! - [`paging`] - Datatables paging model and sort translation
//! - [`config`] - Sort redirects, search fields and page size limits
//! - [`request`] - Whole-request compilation
//!
//! # Quick Start
//!
//! ```
//! use msr_search::filter::{SearchFilter, SearchParameters};
//! use msr_search::CompiledSearch;
//!
//! let filter = SearchFilter::structured(SearchParameters {
//!     mmsi: Some("219000123".to_string()),
//!     imo: Some("9074729".to_string()),
//!     keywords: Some("pilot,vts".to_string()),
//!     ..Default::default()
//! })
//! .with_geometry(r#"{"type": "Point", "coordinates": [12.6, 55.7]}"#);
//!
//! let compiled = CompiledSearch::compile(&filter).unwrap();
//! assert_eq!(
//!     compiled.query,
//!     "(mmsi:219000123 OR imo:9074729) AND (keywords:pilot AND keywords:vts)"
//! );
//! assert_eq!(compiled.geometry.unwrap().type_name(), "Point");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod paging;
pub mod request;

pub use config::SearchConfig;
pub use error::{GeometryParseError, PagingError, SearchError, SearchResult};
pub use filter::{SearchFilter, SearchParameters, compile};
pub use geometry::{Geometry, resolve_geometry};
pub use paging::{PagingRequest, to_index_sort, to_page_spec, to_relational_sort};
pub use request::{CompiledListing, CompiledSearch};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

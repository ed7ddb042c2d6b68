//! Search filter model and query compilation.
//!
//! A [`SearchFilter`] is the body of a SECOM `searchService` request: either
//! free text handed straight to the full-text index, or a set of structured
//! [`SearchParameters`] compiled into a boolean `field:value` query by
//! [`compile`]. The optional geometry member is never inlined into the text
//! query; resolve it with [`crate::geometry::resolve_geometry`].
//!
//! # Example
//!
//! ```
//! use msr_search::filter::{compile, SearchFilter, SearchParameters};
//!
//! let filter = SearchFilter::structured(SearchParameters {
//!     name: Some("Test".to_string()),
//!     status: Some("released".to_string()),
//!     ..Default::default()
//! });
//!
//! assert_eq!(compile(&filter), "name:Test AND status:released");
//! ```

mod compiler;
mod wildcard;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use compiler::{BooleanOperator, compile, escape_value};
pub use wildcard::{WildcardQuery, compile_wildcard};

/// A search request filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Free text passed to the index verbatim. Takes precedence when non-blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freetext: Option<String>,

    /// Structured search parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchParameters>,

    /// Geometry constraint in WKT or GeoJSON form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
}

impl SearchFilter {
    /// Creates a free-text filter.
    pub fn freetext(text: impl Into<String>) -> Self {
        Self {
            freetext: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates a structured filter.
    pub fn structured(query: SearchParameters) -> Self {
        Self {
            query: Some(query),
            ..Default::default()
        }
    }

    /// Sets the geometry constraint.
    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// Returns true when the free text drives compilation.
    ///
    /// That is the case when the free text is non-blank, or when there is no
    /// structured query at all.
    pub fn is_freetext(&self) -> bool {
        self.freetext.as_deref().is_some_and(is_present) || self.query.is_none()
    }
}

/// Structured search parameters of a service instance search.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParameters {
    pub name: Option<String>,
    pub status: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub specification_id: Option<String>,
    pub design_id: Option<String>,
    pub instance_id: Option<String>,
    pub service_type: Option<String>,
    pub unlocode: Option<String>,
    pub endpoint_uri: Option<String>,
    pub data_product_type: Option<DataProductType>,
    pub mmsi: Option<String>,
    pub imo: Option<String>,
    /// Comma separated keyword list.
    pub keywords: Option<String>,
}

/// Returns true for a value that is neither empty nor only whitespace.
pub(crate) fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// SECOM data product types.
///
/// Compiled into queries by their symbolic name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataProductType {
    Other,
    S57,
    S101,
    S102,
    S104,
    S111,
    S122,
    S123,
    S124,
    S125,
    S126,
    S127,
    S128,
    S129,
    S131,
    S201,
    S210,
    S211,
    S212,
    S401,
    S402,
    S411,
    S412,
    S413,
    S414,
    S421,
    Rtz,
}

impl DataProductType {
    /// Returns the symbolic name.
    pub fn as_str(self) -> &'static str {
        match self {
            DataProductType::Other => "OTHER",
            DataProductType::S57 => "S57",
            DataProductType::S101 => "S101",
            DataProductType::S102 => "S102",
            DataProductType::S104 => "S104",
            DataProductType::S111 => "S111",
            DataProductType::S122 => "S122",
            DataProductType::S123 => "S123",
            DataProductType::S124 => "S124",
            DataProductType::S125 => "S125",
            DataProductType::S126 => "S126",
            DataProductType::S127 => "S127",
            DataProductType::S128 => "S128",
            DataProductType::S129 => "S129",
            DataProductType::S131 => "S131",
            DataProductType::S201 => "S201",
            DataProductType::S210 => "S210",
            DataProductType::S211 => "S211",
            DataProductType::S212 => "S212",
            DataProductType::S401 => "S401",
            DataProductType::S402 => "S402",
            DataProductType::S411 => "S411",
            DataProductType::S412 => "S412",
            DataProductType::S413 => "S413",
            DataProductType::S414 => "S414",
            DataProductType::S421 => "S421",
            DataProductType::Rtz => "RTZ",
        }
    }
}

impl fmt::Display for DataProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_uppercase()))
            .map_err(|_| format!("unknown data product type: {}", s))
    }
}

//! Error types for search compilation.
//!
//! Compilation of the text query never fails; the fallible parts are geometry
//! resolution and paging translation, each with its own error enum. Both roll
//! up into [`SearchError`] for callers that handle a whole request at once.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for a search request.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Geometry filter errors
    #[error(transparent)]
    Geometry(#[from] GeometryParseError),

    /// Paging and sorting errors
    #[error(transparent)]
    Paging(#[from] PagingError),
}

impl SearchError {
    /// Returns true when the error was caused by the request content.
    ///
    /// Every error this crate produces is a client input error; the method
    /// exists so transport layers can map errors without matching variants.
    pub fn is_client_error(&self) -> bool {
        match self {
            SearchError::Geometry(_) => true,
            SearchError::Paging(_) => true,
        }
    }
}

/// A non-empty geometry filter that could not be read in either format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryParseError {
    /// The input was valid JSON but not a recognised GeoJSON geometry.
    #[error("invalid GeoJSON geometry: {message}")]
    GeoJson { message: String },

    /// The input was neither JSON nor valid WKT markup.
    #[error("invalid geometry markup: {message}")]
    Markup {
        /// Why the JSON attempt was rejected.
        json_message: String,
        /// Why the WKT attempt was rejected.
        message: String,
    },

    /// The geometry named a coordinate reference system that cannot be mapped to an SRID.
    #[error("unsupported coordinate reference system: {crs}")]
    UnsupportedCrs { crs: String },
}

impl GeometryParseError {
    /// Creates a GeoJSON tree error.
    pub fn geojson(message: impl Into<String>) -> Self {
        GeometryParseError::GeoJson {
            message: message.into(),
        }
    }

    /// Returns the message of the parser that rejected the input last.
    pub fn parser_message(&self) -> &str {
        match self {
            GeometryParseError::GeoJson { message } => message,
            GeometryParseError::Markup { message, .. } => message,
            GeometryParseError::UnsupportedCrs { crs } => crs,
        }
    }
}

/// Errors translating a datatables paging request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PagingError {
    /// An order instruction points past the end of the column list.
    #[error("order column {column} out of range: request defines {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// The page length cannot be used as a divisor.
    #[error("invalid page length: {length}")]
    InvalidPageLength { length: u32 },
}

/// Result type alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Result type alias for geometry resolution.
pub type GeometryResult<T> = Result<T, GeometryParseError>;

/// Result type alias for paging translation.
pub type PagingResult<T> = Result<T, PagingError>;

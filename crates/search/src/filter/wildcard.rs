//! Wildcard keyword search used by the datatables listing views.
//!
//! The listing tables send a single global search value. It is matched as a
//! lower-cased prefix (`value*`) against every configured search field.

use serde::Serialize;

use super::compiler::escape_value;

/// A keyword wildcard query over several fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildcardQuery {
    /// Fields the pattern is matched against; a hit on any field matches.
    pub fields: Vec<String>,
    /// The wildcard pattern, always ending in `*`.
    pub pattern: String,
}

impl WildcardQuery {
    /// Returns true when the pattern matches everything.
    pub fn is_match_all(&self) -> bool {
        self.pattern == "*"
    }

    /// Renders the query in the index query grammar.
    ///
    /// Produces `(f1:p* OR f2:p*)`; colons in the pattern are escaped.
    pub fn to_query_string(&self) -> String {
        let pattern = escape_value(&self.pattern);
        let terms: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}:{}", field, pattern))
            .collect();
        format!("({})", terms.join(" OR "))
    }
}

/// Builds the wildcard query for a datatables search value.
///
/// An absent value matches everything.
pub fn compile_wildcard(value: Option<&str>, fields: &[String]) -> WildcardQuery {
    WildcardQuery {
        fields: fields.to_vec(),
        pattern: format!("{}*", value.unwrap_or("").to_lowercase()),
    }
}

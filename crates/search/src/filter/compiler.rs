//! Boolean query compiler for structured search filters.
//!
//! Translates [`SearchParameters`] into the `field:value` query grammar of the
//! full-text index. Field order is fixed by [`PLAIN_FIELDS`] followed by the
//! MMSI/IMO pair and the keywords group; downstream index tests match on the
//! exact text, so the order must not change.

use std::fmt;

use tracing::debug;

use super::{SearchFilter, SearchParameters, is_present};

/// Operator joining two terms of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    /// Both terms must match.
    And,
    /// Either term may match.
    Or,
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOperator::And => write!(f, "AND"),
            BooleanOperator::Or => write!(f, "OR"),
        }
    }
}

/// A single-valued filter field and how to read it.
struct FieldDescriptor {
    name: &'static str,
    value: fn(&SearchParameters) -> Option<&str>,
}

/// Plain fields in compilation order. Each is ANDed into the query on its own.
const PLAIN_FIELDS: [FieldDescriptor; 11] = [
    FieldDescriptor {
        name: "name",
        value: |p| p.name.as_deref(),
    },
    FieldDescriptor {
        name: "status",
        value: |p| p.status.as_deref(),
    },
    FieldDescriptor {
        name: "version",
        value: |p| p.version.as_deref(),
    },
    FieldDescriptor {
        name: "description",
        value: |p| p.description.as_deref(),
    },
    FieldDescriptor {
        name: "specificationId",
        value: |p| p.specification_id.as_deref(),
    },
    FieldDescriptor {
        name: "designId",
        value: |p| p.design_id.as_deref(),
    },
    FieldDescriptor {
        name: "instanceId",
        value: |p| p.instance_id.as_deref(),
    },
    FieldDescriptor {
        name: "serviceType",
        value: |p| p.service_type.as_deref(),
    },
    FieldDescriptor {
        name: "unlocode",
        value: |p| p.unlocode.as_deref(),
    },
    FieldDescriptor {
        name: "endpointUri",
        value: |p| p.endpoint_uri.as_deref(),
    },
    FieldDescriptor {
        name: "dataProductType",
        value: |p| p.data_product_type.map(|t| t.as_str()),
    },
];

/// Escapes a value for the index query grammar.
///
/// Every `:` is preceded by a backslash so it is not read as a field
/// separator. No other character is touched.
pub fn escape_value(value: &str) -> String {
    value.replace(':', "\\:")
}

/// Accumulates query text, tracking whether a group was just opened.
#[derive(Debug, Default)]
struct QueryText {
    text: String,
    group_start: bool,
}

impl QueryText {
    fn push_term(&mut self, field: &str, value: &str, operator: BooleanOperator) {
        if !self.text.is_empty() && !self.group_start {
            self.text.push(' ');
            self.text.push_str(&operator.to_string());
            self.text.push(' ');
        }
        self.text.push_str(field);
        self.text.push(':');
        self.text.push_str(&escape_value(value));
        self.group_start = false;
    }

    /// Opens a parenthesized group ANDed with any prior content.
    fn open_group(&mut self) {
        self.text
            .push_str(if self.text.is_empty() { "(" } else { " AND (" });
        self.group_start = true;
    }

    fn close_group(&mut self) {
        self.text.push(')');
        self.group_start = false;
    }

    fn into_string(self) -> String {
        self.text
    }
}

/// Compiles a search filter into the index query string.
///
/// Free text (see [`SearchFilter::is_freetext`]) is returned verbatim.
/// Otherwise each present field becomes `field:value`, joined with `AND`.
/// MMSI and IMO together form one `(mmsi:X OR imo:Y)` group, while the
/// keywords form one `(keywords:a AND keywords:b)` group: identifiers widen
/// the match, keywords narrow it.
pub fn compile(filter: &SearchFilter) -> String {
    let query = match &filter.query {
        Some(query) if !filter.is_freetext() => query,
        _ => return filter.freetext.clone().unwrap_or_default(),
    };

    let compiled = compile_parameters(query);
    debug!(query = %compiled, "Compiled structured search filter");
    compiled
}

fn compile_parameters(params: &SearchParameters) -> String {
    let mut query = QueryText::default();

    for field in &PLAIN_FIELDS {
        if let Some(value) = (field.value)(params).filter(|v| is_present(v)) {
            query.push_term(field.name, value, BooleanOperator::And);
        }
    }

    let mmsi = params.mmsi.as_deref().filter(|v| is_present(v));
    let imo = params.imo.as_deref().filter(|v| is_present(v));
    match (mmsi, imo) {
        (Some(mmsi), Some(imo)) => {
            query.open_group();
            query.push_term("mmsi", mmsi, BooleanOperator::Or);
            query.push_term("imo", imo, BooleanOperator::Or);
            query.close_group();
        }
        (Some(mmsi), None) => query.push_term("mmsi", mmsi, BooleanOperator::And),
        (None, Some(imo)) => query.push_term("imo", imo, BooleanOperator::And),
        (None, None) => {}
    }

    if let Some(keywords) = params.keywords.as_deref().filter(|v| is_present(v)) {
        let tokens: Vec<&str> = keywords.split(',').filter(|k| is_present(k)).collect();
        if !tokens.is_empty() {
            query.open_group();
            for keyword in tokens {
                query.push_term("keywords", keyword, BooleanOperator::And);
            }
            query.close_group();
        }
    }

    query.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DataProductType;

    fn structured(params: SearchParameters) -> SearchFilter {
        SearchFilter::structured(params)
    }

    #[test]
    fn test_freetext_is_verbatim() {
        let filter = SearchFilter {
            freetext: Some("name:Test* AND status:released".to_string()),
            query: Some(SearchParameters {
                name: Some("ignored".to_string()),
                ..Default::default()
            }),
            geometry: None,
        };
        assert_eq!(compile(&filter), "name:Test* AND status:released");
    }

    #[test]
    fn test_absent_query_and_freetext_is_empty() {
        assert_eq!(compile(&SearchFilter::default()), "");
    }

    #[test]
    fn test_empty_structured_filter() {
        assert_eq!(compile(&structured(SearchParameters::default())), "");
    }

    #[test]
    fn test_single_field_has_no_operator() {
        let filter = structured(SearchParameters {
            version: Some("1.0".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "version:1.0");
    }

    #[test]
    fn test_name_and_status() {
        let filter = structured(SearchParameters {
            name: Some("Test".to_string()),
            status: Some("released".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "name:Test AND status:released");
    }

    #[test]
    fn test_blank_fields_are_omitted() {
        let filter = structured(SearchParameters {
            name: Some("   ".to_string()),
            status: Some(String::new()),
            unlocode: Some("DKCPH".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "unlocode:DKCPH");
    }

    #[test]
    fn test_colons_are_escaped() {
        let filter = structured(SearchParameters {
            instance_id: Some("urn:mrn:mcp:instance:test".to_string()),
            ..Default::default()
        });
        assert_eq!(
            compile(&filter),
            "instanceId:urn\\:mrn\\:mcp\\:instance\\:test"
        );
    }

    #[test]
    fn test_field_order_is_fixed() {
        let filter = structured(SearchParameters {
            keywords: Some("ais".to_string()),
            imo: Some("9074729".to_string()),
            data_product_type: Some(DataProductType::S124),
            endpoint_uri: Some("https://msr.example.org/api".to_string()),
            unlocode: Some("GBLON".to_string()),
            service_type: Some("NW".to_string()),
            instance_id: Some("inst".to_string()),
            design_id: Some("design".to_string()),
            specification_id: Some("spec".to_string()),
            description: Some("desc".to_string()),
            version: Some("2".to_string()),
            status: Some("provisional".to_string()),
            name: Some("Name".to_string()),
            mmsi: None,
        });
        assert_eq!(
            compile(&filter),
            "name:Name AND status:provisional AND version:2 AND description:desc \
             AND specificationId:spec AND designId:design AND instanceId:inst \
             AND serviceType:NW AND unlocode:GBLON \
             AND endpointUri:https\\://msr.example.org/api AND dataProductType:S124 \
             AND imo:9074729 AND (keywords:ais)"
        );
    }

    #[test]
    fn test_mmsi_and_imo_are_ored() {
        let filter = structured(SearchParameters {
            mmsi: Some("123456789".to_string()),
            imo: Some("9074729".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "(mmsi:123456789 OR imo:9074729)");
    }

    #[test]
    fn test_mmsi_and_imo_group_after_field() {
        let filter = structured(SearchParameters {
            name: Some("Pilot".to_string()),
            mmsi: Some("1".to_string()),
            imo: Some("2".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "name:Pilot AND (mmsi:1 OR imo:2)");
    }

    #[test]
    fn test_single_identifier_is_plain_field() {
        let filter = structured(SearchParameters {
            mmsi: Some("123".to_string()),
            imo: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "mmsi:123");

        let filter = structured(SearchParameters {
            status: Some("released".to_string()),
            imo: Some("456".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "status:released AND imo:456");
    }

    #[test]
    fn test_keywords_are_anded() {
        let filter = structured(SearchParameters {
            keywords: Some("a,b,c".to_string()),
            ..Default::default()
        });
        assert_eq!(
            compile(&filter),
            "(keywords:a AND keywords:b AND keywords:c)"
        );
    }

    #[test]
    fn test_keyword_and_identifier_groups_keep_their_operators() {
        let filter = structured(SearchParameters {
            mmsi: Some("1".to_string()),
            imo: Some("2".to_string()),
            keywords: Some("x,y".to_string()),
            ..Default::default()
        });
        assert_eq!(
            compile(&filter),
            "(mmsi:1 OR imo:2) AND (keywords:x AND keywords:y)"
        );
    }

    #[test]
    fn test_empty_keyword_tokens_are_skipped() {
        let filter = structured(SearchParameters {
            keywords: Some("a,,b,".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "(keywords:a AND keywords:b)");

        let only_commas = structured(SearchParameters {
            name: Some("n".to_string()),
            keywords: Some(",,".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&only_commas), "name:n");
    }

    #[test]
    fn test_value_ending_in_paren_still_gets_operator() {
        let filter = structured(SearchParameters {
            name: Some("Port (".to_string()),
            status: Some("released".to_string()),
            ..Default::default()
        });
        assert_eq!(compile(&filter), "name:Port ( AND status:released");
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("a:b::c"), "a\\:b\\:\\:c");
        assert_eq!(escape_value("plain"), "plain");
        assert_eq!(escape_value("a\\b"), "a\\b");
    }
}

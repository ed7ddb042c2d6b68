//! Geometry filter format detection.
//!
//! The SECOM search interface specifies WKT, but clients also send GeoJSON.
//! The input is first run through a real JSON parser; only when that fails is
//! it read as WKT markup. A leading-character check is not enough because
//! malformed JSON and some markup can start with the same tokens.

use serde_json::Value;
use tracing::{debug, trace};

use super::{Geometry, geojson, markup};
use crate::error::{GeometryParseError, GeometryResult};

/// The outcome of the first (JSON) detection step.
enum Detected {
    /// The input is a JSON document.
    Json(Value),
    /// The input is not JSON; the parser's message is kept for diagnostics.
    NotJson(String),
}

fn detect(text: &str) -> Detected {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Detected::Json(value),
        Err(err) => Detected::NotJson(err.to_string()),
    }
}

/// Resolves a raw geometry filter into a geometry.
///
/// Returns `Ok(None)` when no filter was given (absent, empty, or only
/// whitespace). Any other input must parse as either a GeoJSON geometry or
/// WKT markup, otherwise a [`GeometryParseError`] is returned.
pub fn resolve_geometry(raw: Option<&str>) -> GeometryResult<Option<Geometry>> {
    match raw {
        Some(text) if !text.trim().is_empty() => resolve_text(text).map(Some),
        _ => Ok(None),
    }
}

/// Resolves a non-empty geometry string.
pub(crate) fn resolve_text(text: &str) -> GeometryResult<Geometry> {
    let geometry = match detect(text) {
        // A JSON string holding the geometry text is unwrapped once.
        Detected::Json(Value::String(inner)) => {
            trace!("unwrapping JSON string geometry");
            match detect(&inner) {
                Detected::Json(value) => geojson::from_value(&value),
                Detected::NotJson(json_message) => from_markup(&inner, json_message),
            }
        }
        Detected::Json(value) => geojson::from_value(&value),
        Detected::NotJson(json_message) => from_markup(text, json_message),
    }?;

    debug!(
        geometry_type = geometry.type_name(),
        srid = geometry.srid().code(),
        coords = geometry.shape().num_coords(),
        "Resolved geometry filter"
    );
    Ok(geometry)
}

fn from_markup(text: &str, json_message: String) -> GeometryResult<Geometry> {
    markup::from_wkt(text).map_err(|message| GeometryParseError::Markup {
        json_message,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Shape, Srid};

    #[test]
    fn test_absent_and_empty_resolve_to_none() {
        assert_eq!(resolve_geometry(None).unwrap(), None);
        assert_eq!(resolve_geometry(Some("")).unwrap(), None);
        assert_eq!(resolve_geometry(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_not_geometry_fails() {
        let err = resolve_geometry(Some("not geometry")).unwrap_err();
        assert!(matches!(err, GeometryParseError::Markup { .. }));
    }

    #[test]
    fn test_json_failure_does_not_fall_back_to_markup() {
        // Valid JSON, wrong shape: reported as a GeoJSON error.
        let err = resolve_geometry(Some(r#"{"kind": "Point"}"#)).unwrap_err();
        assert!(matches!(err, GeometryParseError::GeoJson { .. }));

        let err = resolve_geometry(Some("42")).unwrap_err();
        assert!(matches!(err, GeometryParseError::GeoJson { .. }));
    }

    #[test]
    fn test_malformed_json_is_reported_as_markup_failure() {
        let err = resolve_geometry(Some(r#"{"type": "Point", "coordinates": [1, 2]"#)).unwrap_err();
        match err {
            GeometryParseError::Markup { json_message, .. } => {
                assert!(json_message.contains("EOF"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wkt_and_geojson_agree() {
        let wkt = resolve_geometry(Some("LINESTRING (0 0, 1 1, 2 0)")).unwrap().unwrap();
        let json = resolve_geometry(Some(
            r#"{"type":"LineString","coordinates":[[0,0],[1,1],[2,0]]}"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(wkt, json);
    }

    #[test]
    fn test_json_string_is_unwrapped_once() {
        let wrapped = serde_json::to_string(r#"{"type":"Point","coordinates":[4,5]}"#).unwrap();
        let geometry = resolve_geometry(Some(&wrapped)).unwrap().unwrap();
        assert_eq!(geometry, Geometry::point(4.0, 5.0));

        let wrapped_wkt = serde_json::to_string("POINT (4 5)").unwrap();
        assert_eq!(resolve_text(&wrapped_wkt).unwrap(), Geometry::point(4.0, 5.0));

        let twice = serde_json::to_string(&wrapped).unwrap();
        assert!(resolve_text(&twice).is_err());
    }

    #[test]
    fn test_from_str() {
        let geometry: Geometry = "SRID=3857;POINT (10 20)".parse().unwrap();
        assert_eq!(geometry.srid(), Srid(3857));
        assert!(matches!(geometry.shape(), Shape::Point(_)));
    }
}

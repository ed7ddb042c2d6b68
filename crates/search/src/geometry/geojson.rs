//! GeoJSON geometry tree conversion.

use serde_json::{Map, Value, json};

use super::{Coord, Geometry, Shape, Srid};
use crate::error::{GeometryParseError, GeometryResult};

/// Converts a parsed GeoJSON document into a geometry.
///
/// Accepts geometry objects, `GeometryCollection`s and `Feature`s (which
/// resolve to their `geometry` member). A named `crs` member sets the SRID.
pub(crate) fn from_value(value: &Value) -> GeometryResult<Geometry> {
    let object = value.as_object().ok_or_else(|| {
        GeometryParseError::geojson(format!(
            "expected a GeoJSON object, found {}",
            json_kind(value)
        ))
    })?;

    let srid = match object.get("crs") {
        Some(crs) if !crs.is_null() => parse_crs(crs)?,
        _ => Srid::default(),
    };

    let shape = if type_of(object)? == "Feature" {
        match object.get("geometry").and_then(Value::as_object) {
            Some(inner) => shape_from_object(inner)?,
            None => return Err(GeometryParseError::geojson("feature has no geometry")),
        }
    } else {
        shape_from_object(object)?
    };

    Geometry::try_new(shape, srid)
}

/// Renders a geometry as a GeoJSON geometry object.
pub(crate) fn to_value(geometry: &Geometry) -> Value {
    let mut value = shape_to_value(geometry.shape());
    if geometry.srid() != Srid::WGS84 {
        value["crs"] = json!({
            "type": "name",
            "properties": { "name": geometry.srid().to_string() }
        });
    }
    value
}

fn type_of(object: &Map<String, Value>) -> GeometryResult<&str> {
    match object.get("type") {
        Some(Value::String(kind)) => Ok(kind.as_str()),
        Some(other) => Err(GeometryParseError::geojson(format!(
            "'type' must be a string, found {}",
            json_kind(other)
        ))),
        None => Err(GeometryParseError::geojson("missing 'type' member")),
    }
}

fn shape_from_object(object: &Map<String, Value>) -> GeometryResult<Shape> {
    let kind = type_of(object)?;

    if kind == "GeometryCollection" {
        let members = object
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| GeometryParseError::geojson("missing 'geometries' array"))?;
        let shapes = members
            .iter()
            .map(|member| {
                member
                    .as_object()
                    .ok_or_else(|| GeometryParseError::geojson("collection member is not an object"))
                    .and_then(shape_from_object)
            })
            .collect::<GeometryResult<Vec<_>>>()?;
        return Ok(Shape::GeometryCollection(shapes));
    }

    let coordinates = object
        .get("coordinates")
        .ok_or_else(|| GeometryParseError::geojson(format!("{kind} is missing 'coordinates'")))?;

    match kind {
        "Point" => Ok(Shape::Point(position(coordinates)?)),
        "MultiPoint" => Ok(Shape::MultiPoint(positions(coordinates)?)),
        "LineString" => Ok(Shape::LineString(positions(coordinates)?)),
        "MultiLineString" => Ok(Shape::MultiLineString(rings(coordinates)?)),
        "Polygon" => Ok(Shape::Polygon(rings(coordinates)?)),
        "MultiPolygon" => Ok(Shape::MultiPolygon(
            array(coordinates)?
                .iter()
                .map(rings)
                .collect::<GeometryResult<Vec<_>>>()?,
        )),
        other => Err(GeometryParseError::geojson(format!(
            "unsupported geometry type '{other}'"
        ))),
    }
}

fn array(value: &Value) -> GeometryResult<&Vec<Value>> {
    value.as_array().ok_or_else(|| {
        GeometryParseError::geojson(format!(
            "expected a coordinate array, found {}",
            json_kind(value)
        ))
    })
}

/// Reads a position; any elevation or measure after the first two ordinates is dropped.
fn position(value: &Value) -> GeometryResult<Coord> {
    let ordinates = array(value)?;
    if ordinates.len() < 2 {
        return Err(GeometryParseError::geojson(format!(
            "a position needs at least 2 ordinates, found {}",
            ordinates.len()
        )));
    }
    let ordinate = |v: &Value| {
        v.as_f64()
            .ok_or_else(|| GeometryParseError::geojson(format!("ordinate {v} is not a number")))
    };
    Ok(Coord::new(ordinate(&ordinates[0])?, ordinate(&ordinates[1])?))
}

fn positions(value: &Value) -> GeometryResult<Vec<Coord>> {
    array(value)?.iter().map(position).collect()
}

fn rings(value: &Value) -> GeometryResult<Vec<Vec<Coord>>> {
    array(value)?.iter().map(positions).collect()
}

/// Maps a named CRS member (`EPSG:4326`, `urn:ogc:def:crs:EPSG::4326`, CRS84) to an SRID.
fn parse_crs(crs: &Value) -> GeometryResult<Srid> {
    let name = crs
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| GeometryParseError::UnsupportedCrs {
            crs: crs.to_string(),
        })?;

    if name.ends_with("CRS84") {
        return Ok(Srid::WGS84);
    }

    name.rsplit(':')
        .next()
        .and_then(|code| code.parse::<u32>().ok())
        .filter(|_| name.to_ascii_uppercase().contains("EPSG"))
        .map(Srid)
        .ok_or_else(|| GeometryParseError::UnsupportedCrs {
            crs: name.to_string(),
        })
}

fn shape_to_value(shape: &Shape) -> Value {
    match shape {
        Shape::GeometryCollection(shapes) => json!({
            "type": "GeometryCollection",
            "geometries": shapes.iter().map(shape_to_value).collect::<Vec<_>>(),
        }),
        other => json!({
            "type": other.type_name(),
            "coordinates": coordinates_to_value(other),
        }),
    }
}

fn coordinates_to_value(shape: &Shape) -> Value {
    fn pos(c: &Coord) -> Value {
        json!([c.x, c.y])
    }
    fn line(coords: &[Coord]) -> Value {
        Value::Array(coords.iter().map(pos).collect())
    }
    fn lines(rings: &[Vec<Coord>]) -> Value {
        Value::Array(rings.iter().map(|r| line(r)).collect())
    }

    match shape {
        Shape::Point(c) => pos(c),
        Shape::LineString(coords) | Shape::MultiPoint(coords) => line(coords),
        Shape::Polygon(rings) | Shape::MultiLineString(rings) => lines(rings),
        Shape::MultiPolygon(polygons) => {
            Value::Array(polygons.iter().map(|p| lines(p)).collect())
        }
        Shape::GeometryCollection(_) => Value::Null,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

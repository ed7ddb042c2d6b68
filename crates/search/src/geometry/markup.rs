//! WKT markup conversion.
//!
//! Parsing goes through the `wkt` crate into `geo_types` and from there into
//! the canonical [`Shape`]; writing goes the other way.

use std::str::FromStr;

use geo_types::{
    Coord as GeoCoord, Geometry as GeoGeometry, LineString as GeoLineString,
    Polygon as GeoPolygon,
};
use wkt::ToWkt;

use super::{Coord, Geometry, Shape, Srid};

/// Parses WKT (optionally EWKT with an `SRID=<n>;` prefix) into a geometry.
///
/// Errors are returned as the underlying parser's message so the resolver can
/// report it alongside the JSON failure.
pub(crate) fn from_wkt(text: &str) -> Result<Geometry, String> {
    let (srid, body) = split_srid(text.trim())?;

    let parsed = wkt::Wkt::<f64>::from_str(body).map_err(|e| e.to_string())?;
    let geo: GeoGeometry<f64> = parsed
        .try_into()
        .map_err(|e: wkt::conversion::Error| format!("{:?}", e))?;

    Geometry::try_new(shape_from_geo(geo), srid).map_err(|e| e.parser_message().to_string())
}

/// Renders a geometry as WKT.
pub(crate) fn to_wkt(geometry: &Geometry) -> String {
    let body = shape_to_geo(geometry.shape()).wkt_string();
    if geometry.srid() == Srid::WGS84 {
        body
    } else {
        format!("SRID={};{}", geometry.srid().code(), body)
    }
}

fn split_srid(text: &str) -> Result<(Srid, &str), String> {
    let Some((prefix, body)) = text.split_once(';') else {
        return Ok((Srid::default(), text));
    };
    let Some(code) = prefix
        .get(..5)
        .filter(|p| p.eq_ignore_ascii_case("SRID="))
        .map(|_| &prefix[5..])
    else {
        return Ok((Srid::default(), text));
    };
    code.trim()
        .parse::<u32>()
        .map(|code| (Srid(code), body.trim_start()))
        .map_err(|_| format!("invalid SRID prefix '{prefix}'"))
}

fn coord(c: GeoCoord<f64>) -> Coord {
    Coord::new(c.x, c.y)
}

fn line(line: GeoLineString<f64>) -> Vec<Coord> {
    line.0.into_iter().map(coord).collect()
}

fn polygon(polygon: GeoPolygon<f64>) -> Vec<Vec<Coord>> {
    let (exterior, interiors) = polygon.into_inner();
    std::iter::once(exterior)
        .chain(interiors)
        .map(line)
        .collect()
}

fn shape_from_geo(geo: GeoGeometry<f64>) -> Shape {
    match geo {
        GeoGeometry::Point(p) => Shape::Point(coord(p.0)),
        GeoGeometry::Line(l) => Shape::LineString(vec![coord(l.start), coord(l.end)]),
        GeoGeometry::LineString(l) => Shape::LineString(line(l)),
        GeoGeometry::Polygon(p) => Shape::Polygon(polygon(p)),
        GeoGeometry::MultiPoint(mp) => {
            Shape::MultiPoint(mp.0.into_iter().map(|p| coord(p.0)).collect())
        }
        GeoGeometry::MultiLineString(ml) => {
            Shape::MultiLineString(ml.0.into_iter().map(line).collect())
        }
        GeoGeometry::MultiPolygon(mp) => {
            Shape::MultiPolygon(mp.0.into_iter().map(polygon).collect())
        }
        GeoGeometry::GeometryCollection(gc) => {
            Shape::GeometryCollection(gc.0.into_iter().map(shape_from_geo).collect())
        }
        GeoGeometry::Rect(r) => Shape::Polygon(polygon(r.to_polygon())),
        GeoGeometry::Triangle(t) => Shape::Polygon(polygon(t.to_polygon())),
    }
}

fn to_geo_line(coords: &[Coord]) -> GeoLineString<f64> {
    GeoLineString(coords.iter().map(|c| GeoCoord { x: c.x, y: c.y }).collect())
}

fn to_geo_polygon(rings: &[Vec<Coord>]) -> GeoPolygon<f64> {
    let mut lines = rings.iter().map(|r| to_geo_line(r));
    let exterior = lines.next().unwrap_or_else(|| GeoLineString(Vec::new()));
    GeoPolygon::new(exterior, lines.collect())
}

fn shape_to_geo(shape: &Shape) -> GeoGeometry<f64> {
    match shape {
        Shape::Point(c) => GeoGeometry::Point(geo_types::Point::new(c.x, c.y)),
        Shape::LineString(coords) => GeoGeometry::LineString(to_geo_line(coords)),
        Shape::Polygon(rings) => GeoGeometry::Polygon(to_geo_polygon(rings)),
        Shape::MultiPoint(coords) => GeoGeometry::MultiPoint(geo_types::MultiPoint(
            coords
                .iter()
                .map(|c| geo_types::Point::new(c.x, c.y))
                .collect(),
        )),
        Shape::MultiLineString(lines) => GeoGeometry::MultiLineString(
            geo_types::MultiLineString(lines.iter().map(|l| to_geo_line(l)).collect()),
        ),
        Shape::MultiPolygon(polygons) => GeoGeometry::MultiPolygon(geo_types::MultiPolygon(
            polygons.iter().map(|p| to_geo_polygon(p)).collect(),
        )),
        Shape::GeometryCollection(shapes) => GeoGeometry::GeometryCollection(
            geo_types::GeometryCollection(shapes.iter().map(shape_to_geo).collect()),
        ),
    }
}

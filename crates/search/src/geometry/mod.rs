//! Canonical geometry model for spatial search filters.
//!
//! A geometry filter reaches the registry either as WKT markup (the SECOM
//! compliant form) or as a GeoJSON geometry tree. Both are resolved into the
//! same closed [`Shape`] enum carried by a [`Geometry`] together with its
//! spatial reference identifier.
//!
//! - [`resolve_geometry`] - detect the format of a raw filter string and parse it
//! - [`Geometry::to_wkt`] / [`Geometry::to_geojson`] - the inverse conversions
//! - [`Geometry::combine`] - merge several coverage areas into one geometry
//!
//! # Example
//!
//! ```
//! use msr_search::geometry::{resolve_geometry, Shape};
//!
//! let from_wkt = resolve_geometry(Some("POINT (52.001 1.002)")).unwrap().unwrap();
//! let from_json = resolve_geometry(Some(r#"{"type":"Point","coordinates":[52.001,1.002]}"#))
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(from_wkt, from_json);
//! assert!(matches!(from_wkt.shape(), Shape::Point(_)));
//! ```

mod geojson;
mod markup;
mod resolver;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{GeometryParseError, GeometryResult};

pub use resolver::resolve_geometry;

/// A spatial reference system identifier (EPSG code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Srid(pub u32);

impl Srid {
    /// WGS 84 longitude/latitude, the registry's global reference.
    pub const WGS84: Srid = Srid(4326);

    /// Returns the numeric EPSG code.
    pub fn code(self) -> u32 {
        self.0
    }
}

impl Default for Srid {
    fn default() -> Self {
        Srid::WGS84
    }
}

impl fmt::Display for Srid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// A single coordinate pair: `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    /// Longitude or easting.
    pub x: f64,
    /// Latitude or northing.
    pub y: f64,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

/// The geometric shape of a [`Geometry`].
///
/// Polygons are stored as rings, exterior ring first. Every ring is closed
/// (first and last coordinates equal).
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
    GeometryCollection(Vec<Shape>),
}

impl Shape {
    /// Returns the GeoJSON type name of this shape.
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Point(_) => "Point",
            Shape::LineString(_) => "LineString",
            Shape::Polygon(_) => "Polygon",
            Shape::MultiPoint(_) => "MultiPoint",
            Shape::MultiLineString(_) => "MultiLineString",
            Shape::MultiPolygon(_) => "MultiPolygon",
            Shape::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Returns the total number of coordinates in this shape.
    pub fn num_coords(&self) -> usize {
        match self {
            Shape::Point(_) => 1,
            Shape::LineString(line) | Shape::MultiPoint(line) => line.len(),
            Shape::Polygon(rings) | Shape::MultiLineString(rings) => {
                rings.iter().map(Vec::len).sum()
            }
            Shape::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter())
                .map(Vec::len)
                .sum(),
            Shape::GeometryCollection(shapes) => shapes.iter().map(Shape::num_coords).sum(),
        }
    }

    /// Checks the structural rules every shape must satisfy.
    fn validate(&self) -> GeometryResult<()> {
        match self {
            Shape::Point(coord) => check_coord(coord),
            Shape::MultiPoint(coords) => coords.iter().try_for_each(check_coord),
            Shape::LineString(line) => check_line(line),
            Shape::MultiLineString(lines) => lines.iter().try_for_each(|l| check_line(l)),
            Shape::Polygon(rings) => check_polygon(rings),
            Shape::MultiPolygon(polygons) => polygons.iter().try_for_each(|p| check_polygon(p)),
            Shape::GeometryCollection(shapes) => shapes.iter().try_for_each(Shape::validate),
        }
    }
}

fn check_coord(coord: &Coord) -> GeometryResult<()> {
    if coord.x.is_finite() && coord.y.is_finite() {
        Ok(())
    } else {
        Err(GeometryParseError::geojson(format!(
            "coordinate ({}, {}) is not finite",
            coord.x, coord.y
        )))
    }
}

fn check_line(line: &[Coord]) -> GeometryResult<()> {
    if line.len() < 2 {
        return Err(GeometryParseError::geojson(format!(
            "a line needs at least 2 positions, found {}",
            line.len()
        )));
    }
    line.iter().try_for_each(check_coord)
}

fn check_polygon(rings: &[Vec<Coord>]) -> GeometryResult<()> {
    if rings.is_empty() {
        return Err(GeometryParseError::geojson("a polygon needs an exterior ring"));
    }
    for ring in rings {
        if ring.len() < 4 {
            return Err(GeometryParseError::geojson(format!(
                "a linear ring needs at least 4 positions, found {}",
                ring.len()
            )));
        }
        if ring.first() != ring.last() {
            return Err(GeometryParseError::geojson("linear ring is not closed"));
        }
        ring.iter().try_for_each(check_coord)?;
    }
    Ok(())
}

/// A geometry with its spatial reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    shape: Shape,
    srid: Srid,
}

impl Geometry {
    /// Creates a geometry in the default (WGS 84) reference system.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            srid: Srid::default(),
        }
    }

    /// Creates a geometry after checking its structure.
    pub fn try_new(shape: Shape, srid: Srid) -> GeometryResult<Self> {
        shape.validate()?;
        Ok(Self { shape, srid })
    }

    /// Sets the spatial reference.
    pub fn with_srid(mut self, srid: Srid) -> Self {
        self.srid = srid;
        self
    }

    /// Creates a point.
    pub fn point(x: f64, y: f64) -> Self {
        Self::new(Shape::Point(Coord::new(x, y)))
    }

    /// The whole-world polygon used as coverage when an instance declares none.
    pub fn whole_world() -> Self {
        Self::new(Shape::Polygon(vec![vec![
            Coord::new(-180.0, -90.0),
            Coord::new(-180.0, 90.0),
            Coord::new(180.0, 90.0),
            Coord::new(180.0, -90.0),
            Coord::new(-180.0, -90.0),
        ]]))
    }

    /// Returns the shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Consumes the geometry and returns its shape.
    pub fn into_shape(self) -> Shape {
        self.shape
    }

    /// Returns the spatial reference.
    pub fn srid(&self) -> Srid {
        self.srid
    }

    /// Returns the GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }

    /// Renders the geometry as WKT, prefixed with `SRID=<n>;` outside WGS 84.
    pub fn to_wkt(&self) -> String {
        markup::to_wkt(self)
    }

    /// Renders the geometry as a GeoJSON geometry object.
    pub fn to_geojson(&self) -> serde_json::Value {
        geojson::to_value(self)
    }

    /// Combines several geometries into one.
    ///
    /// Returns `None` for an empty input and the geometry itself for a single
    /// one. Homogeneous inputs become the matching multi-geometry; mixed
    /// inputs become a collection. The spatial reference of the first
    /// geometry is kept.
    pub fn combine(parts: Vec<Geometry>) -> Option<Geometry> {
        let srid = parts.first()?.srid;
        if parts.len() == 1 {
            return parts.into_iter().next();
        }

        let shapes: Vec<Shape> = parts.into_iter().map(Geometry::into_shape).collect();
        let combined = if shapes
            .iter()
            .all(|s| matches!(s, Shape::Point(_) | Shape::MultiPoint(_)))
        {
            Shape::MultiPoint(
                shapes
                    .into_iter()
                    .flat_map(|s| match s {
                        Shape::Point(c) => vec![c],
                        Shape::MultiPoint(cs) => cs,
                        _ => Vec::new(),
                    })
                    .collect(),
            )
        } else if shapes
            .iter()
            .all(|s| matches!(s, Shape::LineString(_) | Shape::MultiLineString(_)))
        {
            Shape::MultiLineString(
                shapes
                    .into_iter()
                    .flat_map(|s| match s {
                        Shape::LineString(l) => vec![l],
                        Shape::MultiLineString(ls) => ls,
                        _ => Vec::new(),
                    })
                    .collect(),
            )
        } else if shapes
            .iter()
            .all(|s| matches!(s, Shape::Polygon(_) | Shape::MultiPolygon(_)))
        {
            Shape::MultiPolygon(
                shapes
                    .into_iter()
                    .flat_map(|s| match s {
                        Shape::Polygon(p) => vec![p],
                        Shape::MultiPolygon(ps) => ps,
                        _ => Vec::new(),
                    })
                    .collect(),
            )
        } else {
            Shape::GeometryCollection(shapes)
        };

        Some(Geometry {
            shape: combined,
            srid,
        })
    }
}

impl std::str::FromStr for Geometry {
    type Err = GeometryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolver::resolve_text(s)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wkt())
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_geojson().serialize(serializer)
    }
}

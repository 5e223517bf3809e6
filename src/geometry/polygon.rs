//! Integer polygons with exact shoelace area.

use crate::geometry::{Box2D, Point, PolygonClipper};
use crate::util::{StarDistError, StarDistResult};
use geo_types::{Coord, LineString};

/// Closed polygon given by its vertices in boundary order.
///
/// The ring closes implicitly from the last vertex back to the first.
/// Repeated vertices and self-intersections are permitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from a non-empty vertex list.
    pub fn new(vertices: Vec<Point>) -> StarDistResult<Self> {
        if vertices.is_empty() {
            return Err(StarDistError::EmptyPolygon);
        }
        Ok(Self { vertices })
    }

    pub(crate) fn from_vertices_unchecked(vertices: Vec<Point>) -> Self {
        debug_assert!(!vertices.is_empty());
        Self { vertices }
    }

    /// Returns the vertices in boundary order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; polygons hold at least one vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Twice the signed area; positive for counter-clockwise rings.
    pub fn signed_area_x2(&self) -> i128 {
        shoelace_x2(self.vertices.iter().map(|p| (p.x, p.y)))
    }

    /// Absolute enclosed area in squared scaled units.
    pub fn area(&self) -> f64 {
        self.signed_area_x2().abs() as f64 * 0.5
    }

    /// Returns the tight bounding box of the vertices.
    pub fn bbox(&self) -> Box2D {
        let mut bbox = Box2D::at(self.vertices[0]);
        for p in &self.vertices[1..] {
            bbox.include(*p);
        }
        bbox
    }

    pub(crate) fn to_geo(&self) -> geo_types::Polygon<i64> {
        let coords: Vec<Coord<i64>> = self
            .vertices
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        geo_types::Polygon::new(LineString::from(coords), vec![])
    }
}

/// Area of the intersection of `a` (clip) and `b` (subject).
pub fn intersection_area<C: PolygonClipper + ?Sized>(a: &Polygon, b: &Polygon, clipper: &C) -> f64 {
    clipper.intersection_area(a, b)
}

/// Twice the signed shoelace sum over a cyclic vertex sequence.
pub(crate) fn shoelace_x2<I>(points: I) -> i128
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return 0;
    };
    let mut sum = 0i128;
    let mut prev = first;
    for cur in iter {
        sum += prev.0 as i128 * cur.1 as i128 - cur.0 as i128 * prev.1 as i128;
        prev = cur;
    }
    sum += prev.0 as i128 * first.1 as i128 - first.0 as i128 * prev.1 as i128;
    sum
}

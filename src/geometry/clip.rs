//! Exact polygon intersection through a pluggable clipping backend.

use crate::geometry::polygon::shoelace_x2;
use crate::geometry::Polygon;
use geo_clipper::ClipperInt;
use geo_types::{LineString, MultiPolygon};

/// Boolean polygon intersection under the non-zero fill rule.
///
/// Implementations must handle concave and self-touching input and report
/// zero area, not an error, for disjoint polygons. `Sync` is required so one
/// clipper can be shared by the parallel suppression loop.
pub trait PolygonClipper: Sync {
    /// Returns the summed area of `clip ∩ subject`, holes subtracted.
    fn intersection_area(&self, clip: &Polygon, subject: &Polygon) -> f64;
}

/// Vatti clipping via the Clipper library on 64-bit integer coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClipperNonZero;

impl PolygonClipper for ClipperNonZero {
    fn intersection_area(&self, clip: &Polygon, subject: &Polygon) -> f64 {
        let clip = clip.to_geo();
        let subject = subject.to_geo();
        let result: MultiPolygon<i64> = subject.intersection(&clip);
        multipolygon_area(&result)
    }
}

fn ring_area(ring: &LineString<i64>) -> f64 {
    shoelace_x2(ring.coords().map(|c| (c.x, c.y))).abs() as f64 * 0.5
}

fn multipolygon_area(polys: &MultiPolygon<i64>) -> f64 {
    polys
        .0
        .iter()
        .map(|poly| {
            let holes: f64 = poly.interiors().iter().map(ring_area).sum();
            ring_area(poly.exterior()) - holes
        })
        .sum()
}

//! Fixed-point geometry for candidate polygons.
//!
//! All coordinates are integers pre-multiplied by [`SCALE`], which gives the
//! clipping backend exact input while keeping sub-pixel vertex precision.

pub mod bbox;
pub mod clip;
pub mod polygon;

pub use bbox::Box2D;
pub use clip::{ClipperNonZero, PolygonClipper};
pub use polygon::{intersection_area, Polygon};

/// Fixed-point scale applied to every geometric coordinate.
pub const SCALE: i64 = 100;

/// Largest coordinate magnitude accepted for a vertex.
///
/// Matches the clipping backend's 64-bit fast range and keeps box areas
/// within `i64`.
pub const MAX_COORD: i64 = 0x3FFF_FFFF;

/// Integer point in scaled coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    /// Scaled coordinate along the first grid axis.
    pub x: i64,
    /// Scaled coordinate along the second grid axis.
    pub y: i64,
}

impl Point {
    /// Creates a point from scaled coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

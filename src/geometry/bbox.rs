//! Axis-aligned integer bounding boxes.

use crate::geometry::Point;
use crate::util::{StarDistError, StarDistResult};

/// Closed axis-aligned box in scaled coordinates with `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Box2D {
    xmin: i64,
    xmax: i64,
    ymin: i64,
    ymax: i64,
}

impl Box2D {
    /// Creates a box, rejecting inverted bounds.
    pub fn new(xmin: i64, xmax: i64, ymin: i64, ymax: i64) -> StarDistResult<Self> {
        if xmin > xmax || ymin > ymax {
            return Err(StarDistError::InvalidBounds {
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Returns the tight bound of `points`, or `None` if there are none.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            xmin: first.x,
            xmax: first.x,
            ymin: first.y,
            ymax: first.y,
        };
        for p in &points[1..] {
            bbox.include(*p);
        }
        Some(bbox)
    }

    /// Degenerate box holding a single point.
    pub(crate) fn at(p: Point) -> Self {
        Self {
            xmin: p.x,
            xmax: p.x,
            ymin: p.y,
            ymax: p.y,
        }
    }

    /// Grows the box to contain `p`.
    pub(crate) fn include(&mut self, p: Point) {
        self.xmin = self.xmin.min(p.x);
        self.xmax = self.xmax.max(p.x);
        self.ymin = self.ymin.min(p.y);
        self.ymax = self.ymax.max(p.y);
    }

    pub fn xmin(&self) -> i64 {
        self.xmin
    }

    pub fn xmax(&self) -> i64 {
        self.xmax
    }

    pub fn ymin(&self) -> i64 {
        self.ymin
    }

    pub fn ymax(&self) -> i64 {
        self.ymax
    }

    /// Returns the box area.
    pub fn area(&self) -> i64 {
        (self.xmax - self.xmin) * (self.ymax - self.ymin)
    }

    /// Returns the area of the overlap with `other`, zero when it is degenerate.
    pub fn intersection_area(&self, other: &Box2D) -> i64 {
        let ixmin = self.xmin.max(other.xmin);
        let ixmax = self.xmax.min(other.xmax);
        let iymin = self.ymin.max(other.ymin);
        let iymax = self.ymax.min(other.ymax);
        if ixmin < ixmax && iymin < iymax {
            (ixmax - ixmin) * (iymax - iymin)
        } else {
            0
        }
    }

    /// Axis-separation test; touching edges count as intersecting.
    #[inline]
    pub fn does_intersect(&self, other: &Box2D) -> bool {
        other.xmin <= self.xmax
            && self.xmin <= other.xmax
            && other.ymin <= self.ymax
            && self.ymin <= other.ymax
    }
}

#[cfg(test)]
mod tests {
    use super::Box2D;
    use crate::geometry::Point;

    #[test]
    fn touching_boxes_intersect_with_zero_area() {
        let a = Box2D::new(0, 10, 0, 10).unwrap();
        let b = Box2D::new(10, 20, 0, 10).unwrap();
        assert!(a.does_intersect(&b));
        assert!(b.does_intersect(&a));
        assert_eq!(a.intersection_area(&b), 0);
    }

    #[test]
    fn overlapping_boxes_report_exact_area() {
        let a = Box2D::new(0, 10, 0, 10).unwrap();
        let b = Box2D::new(5, 15, -5, 5).unwrap();
        assert_eq!(a.intersection_area(&b), 25);
        assert_eq!(b.intersection_area(&a), 25);
        assert_eq!(a.area(), 100);
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let a = Box2D::new(0, 10, 0, 10).unwrap();
        let b = Box2D::new(0, 10, 11, 20).unwrap();
        assert!(!a.does_intersect(&b));
        assert_eq!(a.intersection_area(&b), 0);
    }

    #[test]
    fn from_points_is_tight() {
        let pts = [Point::new(3, -1), Point::new(-2, 4), Point::new(0, 0)];
        let bbox = Box2D::from_points(&pts).unwrap();
        assert_eq!(bbox, Box2D::new(-2, 3, -1, 4).unwrap());
        assert!(Box2D::from_points(&[]).is_none());
    }
}

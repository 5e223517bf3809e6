//! Conversion from scaled coordinates to pixel-centred world coordinates.

use crate::geometry::{Box2D, Point, Polygon, SCALE};

/// Maps a scaled point to `v / SCALE + 0.5` on both axes.
pub fn point_to_world(p: Point) -> [f32; 2] {
    let s = SCALE as f32;
    [0.5 + p.x as f32 / s, 0.5 + p.y as f32 / s]
}

/// Polygon vertices in world coordinates.
pub fn polygon_to_world(polygon: &Polygon) -> Vec<[f32; 2]> {
    polygon.vertices().iter().copied().map(point_to_world).collect()
}

/// Box as `[x, y, width, height]` in world coordinates.
pub fn bbox_to_world(bbox: &Box2D) -> [f32; 4] {
    let [x0, y0] = point_to_world(Point::new(bbox.xmin(), bbox.ymin()));
    let [x1, y1] = point_to_world(Point::new(bbox.xmax(), bbox.ymax()));
    [x0, y0, x1 - x0, y1 - y0]
}

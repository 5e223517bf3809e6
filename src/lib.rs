//! Star-convex polygon post-processing for StarDist-style detectors.
//!
//! A dense prediction (per-pixel object probability plus `R` radial
//! distances) is turned into one candidate polygon per pixel above a
//! probability threshold. Candidates are ranked by score and pruned with
//! greedy non-maximum suppression using exact polygon overlap computed in
//! fixed-point integer coordinates. The inner suppression loop runs on the
//! rayon pool when the `rayon` feature (on by default) is enabled.

pub mod candidate;
pub mod detection;
pub mod geometry;
pub mod grid;
pub mod pipeline;
mod trace;
pub mod util;

pub use candidate::nms::{overlap_ratio, OVERLAP_EPS};
pub use candidate::{Candidate, CandidateParams, Candidates, NmsOutcome, NmsParams};
pub use detection::world::{bbox_to_world, point_to_world, polygon_to_world};
pub use detection::{Detections, LabelAllocator, MAX_LABEL_ID};
pub use geometry::{Box2D, ClipperNonZero, Point, Polygon, PolygonClipper, MAX_COORD, SCALE};
pub use grid::{DistView, ProbView};
pub use pipeline::{NmsConfig, Segmentation, StarDistNms};
pub use util::{StarDistError, StarDistResult};

//! Error types for stardist-nms.

use thiserror::Error;

/// Result alias for stardist-nms operations.
pub type StarDistResult<T> = std::result::Result<T, StarDistError>;

/// Errors that can occur while building candidates or running suppression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StarDistError {
    /// A grid has a zero-sized axis.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A grid was given with the wrong number of axes.
    #[error("{grid} grid must have {expected} axes, got shape {got:?}")]
    InvalidShape {
        grid: &'static str,
        expected: usize,
        got: Vec<usize>,
    },
    /// Probability and distance grids disagree on their spatial extent.
    #[error("probability shape {prob:?} does not match distance shape {dist:?}")]
    ShapeMismatch { prob: Vec<usize>, dist: Vec<usize> },
    /// Distance grid has too few rays to describe a polygon.
    #[error("distance grid needs at least 3 rays, got {nrays}")]
    TooFewRays { nrays: usize },
    /// A ray distance is not finite or puts a vertex outside the clipping range.
    #[error("distance {value} at ({i}, {j}) ray {ray} is not finite or out of range")]
    InvalidDistance {
        i: usize,
        j: usize,
        ray: usize,
        value: f32,
    },
    /// Bounding box with min greater than max on some axis.
    #[error("invalid bounds: x [{xmin}, {xmax}], y [{ymin}, {ymax}]")]
    InvalidBounds {
        xmin: i64,
        xmax: i64,
        ymin: i64,
        ymax: i64,
    },
    /// A configuration value is outside its documented range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// Polygon without vertices.
    #[error("polygon must have at least one vertex")]
    EmptyPolygon,
    /// An index is out of bounds for a container.
    #[error("{context} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
}

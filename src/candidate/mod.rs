//! Candidate polygons, ranking, and greedy non-maximum suppression.
//!
//! Every grid pixel whose score exceeds the probability threshold yields one
//! star-convex [`Candidate`]. Candidates are stored in scan order and ranked by
//! descending score; suppression walks that ranking.

pub(crate) mod build;
pub mod nms;
#[cfg(feature = "rayon")]
pub(crate) mod par;
pub(crate) mod rank;

use crate::geometry::{Box2D, ClipperNonZero, Point, Polygon, PolygonClipper};
use crate::grid::{DistView, ProbView};
use crate::util::{StarDistError, StarDistResult};

pub use nms::{NmsOutcome, NmsParams};

/// One hypothesised object polygon generated from a single grid pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Generating pixel in scaled coordinates.
    pub origin: Point,
    /// Star-convex polygon, one vertex per ray in ray order.
    pub polygon: Polygon,
    /// Tight bounding box of `polygon`.
    pub bbox: Box2D,
    /// Shoelace area of `polygon`.
    pub area: f64,
    /// Probability read at the generating pixel.
    pub score: f32,
}

impl Candidate {
    /// Builds a candidate from a polygon, deriving its box and area.
    pub fn new(origin: Point, polygon: Polygon, score: f32) -> Self {
        let bbox = polygon.bbox();
        let area = polygon.area();
        Self {
            origin,
            polygon,
            bbox,
            area,
            score,
        }
    }
}

/// Parameters for candidate generation.
#[derive(Clone, Copy, Debug)]
pub struct CandidateParams {
    /// Pixels must score strictly above this value.
    pub prob_thresh: f32,
    /// Pixels closer than this to any edge are skipped.
    pub boundary: usize,
    /// Scan rows on the rayon pool when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for CandidateParams {
    fn default() -> Self {
        Self {
            prob_thresh: 0.5,
            boundary: 2,
            parallel: true,
        }
    }
}

impl CandidateParams {
    /// Checks that the threshold is usable.
    pub fn validate(&self) -> StarDistResult<()> {
        if !self.prob_thresh.is_finite() {
            return Err(StarDistError::InvalidParameter {
                name: "prob_thresh",
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

/// Candidate list in scan order together with its score ranking.
#[derive(Clone, Debug)]
pub struct Candidates {
    items: Vec<Candidate>,
    ranking: Vec<usize>,
}

impl Candidates {
    /// Scans the prediction grids and builds one candidate per qualifying pixel.
    pub fn build(
        prob: ProbView<'_>,
        dist: DistView<'_>,
        params: &CandidateParams,
    ) -> StarDistResult<Self> {
        let items = build::build_candidates(prob, dist, params)?;
        Ok(Self::from_vec(items))
    }

    /// Wraps an existing candidate list; list order is treated as scan order.
    pub fn from_vec(items: Vec<Candidate>) -> Self {
        let ranking = rank::argsort_desc(&items);
        Self { items, ranking }
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no pixel qualified.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the candidate at scan index `index`.
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.items.get(index)
    }

    /// Returns all candidates in scan order.
    pub fn as_slice(&self) -> &[Candidate] {
        &self.items
    }

    /// Returns candidate indices by descending score, ties in scan order.
    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }

    /// Runs suppression with the default clipper.
    pub fn nms(&self, params: &NmsParams) -> StarDistResult<NmsOutcome> {
        nms::suppress(self, params, &ClipperNonZero)
    }

    /// Runs suppression with a caller-supplied clipping backend.
    pub fn nms_with<C: PolygonClipper + ?Sized>(
        &self,
        params: &NmsParams,
        clipper: &C,
    ) -> StarDistResult<NmsOutcome> {
        nms::suppress(self, params, clipper)
    }
}

//! High-level driver from prediction grids to suppressed detections.

use crate::candidate::{CandidateParams, Candidates, NmsOutcome, NmsParams};
use crate::detection::Detections;
use crate::geometry::{ClipperNonZero, PolygonClipper};
use crate::grid::{DistView, ProbView};
use crate::trace::{trace_event, trace_span};
use crate::util::{StarDistError, StarDistResult};

/// Post-processing configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NmsConfig {
    /// Pixels must score strictly above this value to produce a candidate.
    pub prob_thresh: f32,
    /// Overlap ratio above which a lower-ranked candidate is suppressed, in `[0, 1)`.
    pub nms_thresh: f64,
    /// Boundary exclusion margin in pixels.
    pub boundary: usize,
    /// Use the rayon pool for scanning and suppression.
    pub parallel: bool,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            prob_thresh: 0.5,
            nms_thresh: 0.4,
            boundary: 2,
            parallel: true,
        }
    }
}

impl NmsConfig {
    /// Rejects out-of-range parameters before any work is done.
    pub fn validate(&self) -> StarDistResult<()> {
        self.candidate_params().validate()?;
        self.nms_params().validate()
    }

    pub fn candidate_params(&self) -> CandidateParams {
        CandidateParams {
            prob_thresh: self.prob_thresh,
            boundary: self.boundary,
            parallel: self.parallel,
        }
    }

    pub fn nms_params(&self) -> NmsParams {
        NmsParams {
            overlap_thresh: self.nms_thresh,
            parallel: self.parallel,
        }
    }
}

/// Candidates of one frame and the result of suppressing them.
#[derive(Clone, Debug)]
pub struct Segmentation {
    candidates: Candidates,
    outcome: NmsOutcome,
}

impl Segmentation {
    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn outcome(&self) -> &NmsOutcome {
        &self.outcome
    }

    /// Winning candidate indices, best score first.
    pub fn winners(&self) -> &[usize] {
        self.outcome.winners()
    }

    /// Read-only view for exporters.
    pub fn detections(&self) -> Detections<'_> {
        Detections::from_parts(&self.candidates, &self.outcome)
    }

    /// Discards the previous pass and suppresses again with new parameters.
    pub fn resuppress<C: PolygonClipper + ?Sized>(
        &mut self,
        params: &NmsParams,
        clipper: &C,
    ) -> StarDistResult<()> {
        self.outcome = self.candidates.nms_with(params, clipper)?;
        Ok(())
    }
}

/// Star-convex polygon post-processor.
#[derive(Clone, Debug, Default)]
pub struct StarDistNms<C = ClipperNonZero> {
    cfg: NmsConfig,
    clipper: C,
}

impl StarDistNms<ClipperNonZero> {
    /// Creates a post-processor with default settings and the Clipper backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: PolygonClipper> StarDistNms<C> {
    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: NmsConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Swaps the clipping backend.
    pub fn with_clipper<D: PolygonClipper>(self, clipper: D) -> StarDistNms<D> {
        StarDistNms {
            cfg: self.cfg,
            clipper,
        }
    }

    pub fn config(&self) -> &NmsConfig {
        &self.cfg
    }

    /// Builds candidates for one frame and suppresses overlaps.
    pub fn segment(&self, prob: ProbView<'_>, dist: DistView<'_>) -> StarDistResult<Segmentation> {
        self.cfg.validate()?;
        let _span = trace_span!("segment_frame").entered();

        let candidates = Candidates::build(prob, dist, &self.cfg.candidate_params())?;
        let outcome = candidates.nms_with(&self.cfg.nms_params(), &self.clipper)?;
        trace_event!(
            "segment_summary",
            candidates = candidates.len(),
            winners = outcome.winners().len()
        );
        Ok(Segmentation {
            candidates,
            outcome,
        })
    }

    /// Segments each frame of a timelapse independently.
    pub fn segment_frames(
        &self,
        probs: &[ProbView<'_>],
        dists: &[DistView<'_>],
    ) -> StarDistResult<Vec<Segmentation>> {
        if probs.len() != dists.len() {
            return Err(StarDistError::ShapeMismatch {
                prob: vec![probs.len()],
                dist: vec![dists.len()],
            });
        }
        self.cfg.validate()?;
        probs
            .iter()
            .zip(dists)
            .map(|(&prob, &dist)| self.segment(prob, dist))
            .collect()
    }
}

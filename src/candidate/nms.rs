//! Greedy non-maximum suppression over ranked candidates.
//!
//! The walk over the ranking is sequential. For each winner, every lower
//! ranked candidate that is still undecided is compared against it and
//! suppressed when the overlap ratio exceeds the threshold. That inner loop can
//! fan out over the rayon pool; it is joined before the next winner is chosen.
//!
//! Suppression flags are kept in rank order while the pass runs, so the
//! candidates below the current winner form one contiguous slice. Each worker
//! gets exclusive `&mut` access to its own slots, which makes the unlocked
//! writes safe by construction: a slot is written by at most one worker per
//! step, the winner's own slot is outside the slice, and writes only ever go
//! from `false` to `true`.

use crate::candidate::{Candidate, Candidates};
use crate::geometry::{intersection_area, PolygonClipper};
use crate::trace::{trace_event, trace_span};
use crate::util::{StarDistError, StarDistResult};

/// Guard added to both areas so degenerate polygons do not divide by zero.
pub const OVERLAP_EPS: f64 = 1e-10;

/// Parameters for a suppression pass.
#[derive(Clone, Copy, Debug)]
pub struct NmsParams {
    /// Candidates overlapping a winner by more than this ratio are suppressed.
    pub overlap_thresh: f64,
    /// Fan the per-winner comparisons out over rayon when available.
    pub parallel: bool,
}

impl Default for NmsParams {
    fn default() -> Self {
        Self {
            overlap_thresh: 0.4,
            parallel: true,
        }
    }
}

impl NmsParams {
    /// Checks that the threshold lies in `[0, 1)`.
    pub fn validate(&self) -> StarDistResult<()> {
        if !(0.0..1.0).contains(&self.overlap_thresh) {
            return Err(StarDistError::InvalidParameter {
                name: "nms_thresh",
                reason: "must be in [0, 1)",
            });
        }
        Ok(())
    }
}

/// Winners and suppression flags produced by one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NmsOutcome {
    winners: Vec<usize>,
    suppressed: Vec<bool>,
}

impl NmsOutcome {
    /// Winning candidate indices, best score first.
    pub fn winners(&self) -> &[usize] {
        &self.winners
    }

    /// Per-candidate suppression flags indexed by scan order.
    pub fn suppressed(&self) -> &[bool] {
        &self.suppressed
    }

    /// Returns true if candidate `index` was suppressed.
    pub fn is_suppressed(&self, index: usize) -> bool {
        self.suppressed.get(index).copied().unwrap_or(false)
    }

    /// Number of candidates the pass ran over.
    pub fn num_candidates(&self) -> usize {
        self.suppressed.len()
    }
}

/// Intersection area over the smaller of the two guarded areas.
pub fn overlap_ratio<C: PolygonClipper + ?Sized>(a: &Candidate, b: &Candidate, clipper: &C) -> f64 {
    let inter = intersection_area(&a.polygon, &b.polygon, clipper);
    inter / (a.area + OVERLAP_EPS).min(b.area + OVERLAP_EPS)
}

/// Decides the fate of one lower-ranked candidate against the current winner.
#[inline]
pub(crate) fn decide<C: PolygonClipper + ?Sized>(
    winner: &Candidate,
    other: &Candidate,
    suppressed: &mut bool,
    threshold: f64,
    clipper: &C,
) {
    if *suppressed || !winner.bbox.does_intersect(&other.bbox) {
        return;
    }
    if overlap_ratio(winner, other, clipper) > threshold {
        *suppressed = true;
    }
}

fn suppress_step_seq<C: PolygonClipper + ?Sized>(
    winner: &Candidate,
    others: &[&Candidate],
    flags: &mut [bool],
    threshold: f64,
    clipper: &C,
) {
    for (flag, other) in flags.iter_mut().zip(others) {
        decide(winner, other, flag, threshold, clipper);
    }
}

#[cfg(feature = "rayon")]
fn suppress_step<C: PolygonClipper + ?Sized>(
    winner: &Candidate,
    others: &[&Candidate],
    flags: &mut [bool],
    params: &NmsParams,
    clipper: &C,
) {
    if params.parallel {
        crate::candidate::par::suppress_step_par(
            winner,
            others,
            flags,
            params.overlap_thresh,
            clipper,
        );
    } else {
        suppress_step_seq(winner, others, flags, params.overlap_thresh, clipper);
    }
}

#[cfg(not(feature = "rayon"))]
fn suppress_step<C: PolygonClipper + ?Sized>(
    winner: &Candidate,
    others: &[&Candidate],
    flags: &mut [bool],
    params: &NmsParams,
    clipper: &C,
) {
    suppress_step_seq(winner, others, flags, params.overlap_thresh, clipper);
}

/// Runs one greedy suppression pass from a clean state.
pub fn suppress<C: PolygonClipper + ?Sized>(
    candidates: &Candidates,
    params: &NmsParams,
    clipper: &C,
) -> StarDistResult<NmsOutcome> {
    params.validate()?;

    let n = candidates.len();
    let ranking = candidates.ranking();
    let _span = trace_span!("nms", candidates = n, overlap_thresh = params.overlap_thresh).entered();

    let ranked: Vec<&Candidate> = ranking
        .iter()
        .map(|&idx| &candidates.as_slice()[idx])
        .collect();
    let mut flags = vec![false; n];
    let mut winners = Vec::new();

    for ii in 0..n {
        if flags[ii] {
            continue;
        }
        winners.push(ranking[ii]);
        let rest = &mut flags[ii + 1..];
        suppress_step(ranked[ii], &ranked[ii + 1..], rest, params, clipper);
    }

    let mut suppressed = vec![false; n];
    for (&idx, &flag) in ranking.iter().zip(&flags) {
        suppressed[idx] = flag;
    }

    trace_event!("nms_winners", winners = winners.len(), candidates = n);
    Ok(NmsOutcome {
        winners,
        suppressed,
    })
}

#[cfg(test)]
mod tests {
    use super::{overlap_ratio, suppress, NmsParams};
    use crate::candidate::{Candidate, Candidates};
    use crate::geometry::{ClipperNonZero, Point, Polygon};
    use crate::util::StarDistError;

    fn rect_candidate(x0: i64, y0: i64, x1: i64, y1: i64, score: f32) -> Candidate {
        let poly = Polygon::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
        .unwrap();
        Candidate::new(Point::new((x0 + x1) / 2, (y0 + y1) / 2), poly, score)
    }

    fn seq(thresh: f64) -> NmsParams {
        NmsParams {
            overlap_thresh: thresh,
            parallel: false,
        }
    }

    #[test]
    fn identical_polygons_overlap_fully() {
        let a = rect_candidate(0, 0, 100, 100, 0.9);
        let ratio = overlap_ratio(&a, &a, &ClipperNonZero);
        assert!((ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn overlap_at_threshold_is_kept() {
        // Intersection is half of the smaller area; the guard keeps the ratio just below 0.5.
        let items = vec![
            rect_candidate(0, 0, 100, 100, 0.9),
            rect_candidate(50, 0, 150, 100, 0.8),
        ];
        let cands = Candidates::from_vec(items);
        let kept = suppress(&cands, &seq(0.5), &ClipperNonZero).unwrap();
        assert_eq!(kept.winners(), &[0, 1]);

        let dropped = suppress(&cands, &seq(0.49), &ClipperNonZero).unwrap();
        assert_eq!(dropped.winners(), &[0]);
        assert_eq!(dropped.suppressed(), &[false, true]);
    }

    #[test]
    fn suppressed_candidate_cannot_suppress_others() {
        // b overlaps a and c heavily, a and c are disjoint.
        let items = vec![
            rect_candidate(0, 0, 100, 100, 0.9),
            rect_candidate(40, 0, 160, 100, 0.8),
            rect_candidate(120, 0, 220, 100, 0.7),
        ];
        let cands = Candidates::from_vec(items);
        let out = suppress(&cands, &seq(0.3), &ClipperNonZero).unwrap();
        assert_eq!(out.winners(), &[0, 2]);
        assert!(out.is_suppressed(1));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let cands = Candidates::from_vec(Vec::new());
        for bad in [1.0, -0.1, f64::NAN] {
            let err = suppress(&cands, &seq(bad), &ClipperNonZero).unwrap_err();
            assert_eq!(
                err,
                StarDistError::InvalidParameter {
                    name: "nms_thresh",
                    reason: "must be in [0, 1)",
                }
            );
        }
    }

    #[test]
    fn zero_area_candidates_use_the_guard() {
        let point = Polygon::new(vec![Point::new(10, 10); 3]).unwrap();
        let items = vec![
            Candidate::new(Point::new(10, 10), point.clone(), 0.9),
            Candidate::new(Point::new(10, 10), point, 0.8),
        ];
        let cands = Candidates::from_vec(items);
        let out = suppress(&cands, &seq(0.0), &ClipperNonZero).unwrap();
        assert_eq!(out.winners(), &[0, 1]);
    }
}

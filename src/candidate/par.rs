//! Rayon-parallel candidate scanning and suppression steps (feature-gated).

use crate::candidate::build::{scan_row, RayDirs};
use crate::candidate::nms::decide;
use crate::candidate::{Candidate, CandidateParams};
use crate::geometry::PolygonClipper;
use crate::grid::{DistView, ProbView};
use crate::util::StarDistResult;
use rayon::prelude::*;
use std::ops::Range;

/// Row-parallel candidate scan; rows are concatenated in order afterwards.
pub(crate) fn scan_rows_par(
    prob: ProbView<'_>,
    dist: DistView<'_>,
    rows: Range<usize>,
    params: &CandidateParams,
    dirs: &RayDirs,
) -> StarDistResult<Vec<Candidate>> {
    let per_row: Vec<Vec<Candidate>> = rows
        .into_par_iter()
        .map(|i| -> StarDistResult<Vec<Candidate>> {
            let mut row = Vec::new();
            scan_row(prob, dist, i, params, dirs, &mut row)?;
            Ok(row)
        })
        .collect::<StarDistResult<_>>()?;
    Ok(per_row.into_iter().flatten().collect())
}

/// Compares the winner against every lower-ranked candidate in parallel.
///
/// `flags[k]` belongs to `others[k]`; `par_iter_mut` hands each slot to
/// exactly one task. Returns once every comparison has finished.
pub(crate) fn suppress_step_par<C: PolygonClipper + ?Sized>(
    winner: &Candidate,
    others: &[&Candidate],
    flags: &mut [bool],
    threshold: f64,
    clipper: &C,
) {
    flags
        .par_iter_mut()
        .zip(others.par_iter())
        .for_each(|(flag, other)| decide(winner, other, flag, threshold, clipper));
}

//! Candidate construction from the probability and distance grids.

use crate::candidate::{Candidate, CandidateParams};
use crate::geometry::{Box2D, Point, Polygon, MAX_COORD, SCALE};
use crate::grid::{DistView, ProbView};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{ray_angles, round_half_up};
use crate::util::{StarDistError, StarDistResult};

/// Unit direction `(cos φ_k, sin φ_k)` per ray.
pub(crate) type RayDirs = [(f64, f64)];

pub(crate) fn ray_directions(nrays: usize) -> Vec<(f64, f64)> {
    ray_angles(nrays)
        .into_iter()
        .map(|phi| {
            let (sin, cos) = phi.sin_cos();
            (cos, sin)
        })
        .collect()
}

pub(crate) fn validate_shapes(prob: &ProbView<'_>, dist: &DistView<'_>) -> StarDistResult<()> {
    if prob.width() != dist.width() || prob.height() != dist.height() {
        return Err(StarDistError::ShapeMismatch {
            prob: prob.shape().to_vec(),
            dist: dist.shape().to_vec(),
        });
    }
    if dist.nrays() < 3 {
        return Err(StarDistError::TooFewRays {
            nrays: dist.nrays(),
        });
    }
    Ok(())
}

pub(crate) fn build_candidates(
    prob: ProbView<'_>,
    dist: DistView<'_>,
    params: &CandidateParams,
) -> StarDistResult<Vec<Candidate>> {
    params.validate()?;
    validate_shapes(&prob, &dist)?;

    let _span = trace_span!(
        "build_candidates",
        width = prob.width(),
        height = prob.height(),
        nrays = dist.nrays()
    )
    .entered();

    let dirs = ray_directions(dist.nrays());
    let b = params.boundary;
    let rows = b..prob.width().saturating_sub(b);

    #[cfg(feature = "rayon")]
    let items = if params.parallel {
        crate::candidate::par::scan_rows_par(prob, dist, rows, params, &dirs)?
    } else {
        scan_rows(prob, dist, rows, params, &dirs)?
    };
    #[cfg(not(feature = "rayon"))]
    let items = scan_rows(prob, dist, rows, params, &dirs)?;

    trace_event!("candidates", count = items.len());
    Ok(items)
}

fn scan_rows(
    prob: ProbView<'_>,
    dist: DistView<'_>,
    rows: std::ops::Range<usize>,
    params: &CandidateParams,
    dirs: &RayDirs,
) -> StarDistResult<Vec<Candidate>> {
    let mut items = Vec::new();
    for i in rows {
        scan_row(prob, dist, i, params, dirs, &mut items)?;
    }
    Ok(items)
}

/// Appends the candidates of row `i` in column order.
pub(crate) fn scan_row(
    prob: ProbView<'_>,
    dist: DistView<'_>,
    i: usize,
    params: &CandidateParams,
    dirs: &RayDirs,
    out: &mut Vec<Candidate>,
) -> StarDistResult<()> {
    let b = params.boundary;
    for j in b..prob.height().saturating_sub(b) {
        let score = prob.get(i, j).ok_or(StarDistError::IndexOutOfBounds {
            index: i * prob.height() + j,
            len: prob.width() * prob.height(),
            context: "probability",
        })?;
        if score > params.prob_thresh {
            let rays = dist.rays(i, j).ok_or(StarDistError::IndexOutOfBounds {
                index: i * dist.height() + j,
                len: dist.width() * dist.height(),
                context: "distance",
            })?;
            out.push(star_candidate(i, j, score, rays, dirs)?);
        }
    }
    Ok(())
}

/// Builds the star-convex polygon of pixel `(i, j)` at fixed-point scale.
///
/// Fails on a non-finite distance or a vertex beyond [`MAX_COORD`].
pub(crate) fn star_candidate(
    i: usize,
    j: usize,
    score: f32,
    rays: &[f32],
    dirs: &RayDirs,
) -> StarDistResult<Candidate> {
    let s = SCALE as f64;
    let (ci, cj) = (i as f64, j as f64);
    let limit = MAX_COORD as f64;
    let mut vertices = Vec::with_capacity(rays.len());
    let mut bbox: Option<Box2D> = None;
    for (ray, (&value, &(cos, sin))) in rays.iter().zip(dirs).enumerate() {
        let d = value as f64;
        let (x, y) = (s * (ci + d * cos), s * (cj + d * sin));
        if !d.is_finite() || x.abs() > limit || y.abs() > limit {
            return Err(StarDistError::InvalidDistance { i, j, ray, value });
        }
        let p = Point::new(round_half_up(x), round_half_up(y));
        match bbox.as_mut() {
            Some(bbox) => bbox.include(p),
            None => bbox = Some(Box2D::at(p)),
        }
        vertices.push(p);
    }

    let origin = Point::new(SCALE * i as i64, SCALE * j as i64);
    let polygon = Polygon::from_vertices_unchecked(vertices);
    let area = polygon.area();
    Ok(Candidate {
        origin,
        bbox: bbox.unwrap_or_else(|| Box2D::at(origin)),
        polygon,
        area,
        score,
    })
}

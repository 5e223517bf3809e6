//! Numeric helpers for ray geometry and fixed-point rounding.

use std::f64::consts::PI;

/// Returns `n` evenly spaced ray angles in radians, starting at zero.
pub(crate) fn ray_angles(n: usize) -> Vec<f64> {
    let step = 2.0 * PI / n as f64;
    (0..n).map(|k| step * k as f64).collect()
}

/// Rounds half up to the nearest integer (`floor(v + 0.5)`).
#[inline]
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

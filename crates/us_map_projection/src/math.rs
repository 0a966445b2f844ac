//! Shared numeric constants and helpers for spherical math.
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;

pub(crate) const EPSILON: f64 = 1e-6;
pub(crate) const RADIANS: f64 = PI / 180.0;
pub(crate) const DEGREES: f64 = 180.0 / PI;
pub(crate) const HALF_PI: f64 = FRAC_PI_2;

/// `asin` clamped to `[-π/2, π/2]` so that rounding just outside `[-1, 1]` does not yield NaN.
#[inline]
pub(crate) fn asin(x: f64) -> f64 {
    if x > 1.0 {
        HALF_PI
    } else if x < -1.0 {
        -HALF_PI
    } else {
        x.asin()
    }
}

/// Sign of `x` as `-1`, `0` or `1` (zero maps to zero, unlike [`f64::signum`]).
#[inline]
pub(crate) fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Wraps a longitude in radians into `[-π, π]`.
#[inline]
pub(crate) fn wrap_longitude(lambda: f64) -> f64 {
    if lambda.abs() > PI {
        lambda - (lambda / TAU).round() * TAU
    } else {
        lambda
    }
}

/// Unit vector for a spherical `(λ, φ)` in radians.
#[inline]
pub(crate) fn cartesian(lambda: f64, phi: f64) -> DVec3 {
    let cos_phi = phi.cos();
    DVec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin())
}

//! Spherical rotation by yaw (λ), pitch (φ) and roll (γ).
use glam::{DVec2, DVec3};

use crate::math::{asin, wrap_longitude, DEGREES, RADIANS};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PhiGamma {
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    cos_delta_gamma: f64,
    sin_delta_gamma: f64,
}

impl PhiGamma {
    fn new(delta_phi: f64, delta_gamma: f64) -> Self {
        Self {
            cos_delta_phi: delta_phi.cos(),
            sin_delta_phi: delta_phi.sin(),
            cos_delta_gamma: delta_gamma.cos(),
            sin_delta_gamma: delta_gamma.sin(),
        }
    }

    fn forward(&self, lambda: f64, phi: f64) -> DVec2 {
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_phi + x * self.sin_delta_phi;
        DVec2::new(
            (y * self.cos_delta_gamma - k * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi - z * self.sin_delta_phi),
            asin(k * self.cos_delta_gamma + y * self.sin_delta_gamma),
        )
    }

    fn invert(&self, lambda: f64, phi: f64) -> DVec2 {
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_gamma - y * self.sin_delta_gamma;
        DVec2::new(
            (y * self.cos_delta_gamma + z * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi + k * self.sin_delta_phi),
            asin(k * self.cos_delta_phi - x * self.sin_delta_phi),
        )
    }
}

/// A rotation of the sphere, applied before projecting.
///
/// A pure yaw rotation shifts and re-wraps longitudes; pitch and roll go through the
/// cartesian form. The identity rotation still wraps longitudes into `[-π, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    delta_lambda: f64,
    phi_gamma: Option<PhiGamma>,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Rotation {
    /// Builds a rotation from yaw, pitch and roll in radians.
    pub fn new(delta_lambda: f64, delta_phi: f64, delta_gamma: f64) -> Self {
        let phi_gamma = (delta_phi != 0.0 || delta_gamma != 0.0)
            .then(|| PhiGamma::new(delta_phi, delta_gamma));
        Self {
            delta_lambda: delta_lambda % std::f64::consts::TAU,
            phi_gamma,
        }
    }

    /// Builds a rotation from `[yaw, pitch, roll]` in degrees.
    pub fn from_degrees(angles: impl Into<DVec3>) -> Self {
        let a = angles.into() * RADIANS;
        Self::new(a.x, a.y, a.z)
    }

    /// Rotates `(λ, φ)` in radians.
    pub fn forward(&self, lambda: f64, phi: f64) -> DVec2 {
        let lambda = if self.delta_lambda != 0.0 {
            wrap_longitude(lambda + self.delta_lambda)
        } else if self.phi_gamma.is_none() {
            wrap_longitude(lambda)
        } else {
            lambda
        };
        match &self.phi_gamma {
            Some(pg) => pg.forward(lambda, phi),
            None => DVec2::new(lambda, phi),
        }
    }

    /// Inverse of [`Rotation::forward`].
    pub fn invert(&self, lambda: f64, phi: f64) -> DVec2 {
        let p = match &self.phi_gamma {
            Some(pg) => pg.invert(lambda, phi),
            None => DVec2::new(lambda, phi),
        };
        let lambda = if self.delta_lambda != 0.0 {
            wrap_longitude(p.x - self.delta_lambda)
        } else if self.phi_gamma.is_none() {
            wrap_longitude(p.x)
        } else {
            p.x
        };
        DVec2::new(lambda, p.y)
    }

    /// Rotates a `[longitude, latitude]` point in degrees.
    pub fn apply(&self, point: impl Into<DVec2>) -> DVec2 {
        let p = point.into() * RADIANS;
        self.forward(p.x, p.y) * DEGREES
    }

    /// Inverse-rotates a `[longitude, latitude]` point in degrees.
    pub fn apply_inverse(&self, point: impl Into<DVec2>) -> DVec2 {
        let p = point.into() * RADIANS;
        self.invert(p.x, p.y) * DEGREES
    }
}

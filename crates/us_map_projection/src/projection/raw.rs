//! Raw projections: unit-sphere forward and inverse maps in radians.
//!
//! Raw projections know nothing about scale, translation, rotation or clipping; those are
//! layered on by [`crate::projection::Projection`].
use glam::DVec2;

use crate::math::{asin, sign, EPSILON};

/// Albers conic equal-area parameters for a pair of standard parallels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
}

impl ConicEqualArea {
    fn project(&self, lambda: f64, phi: f64) -> DVec2 {
        let r = (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let x = lambda * self.n;
        DVec2::new(r * x.sin(), self.r0 - r * x.cos())
    }

    fn invert(&self, x: f64, y: f64) -> DVec2 {
        let r0y = self.r0 - y;
        let mut lambda = x.atan2(r0y.abs()) * sign(r0y);
        if r0y * self.n < 0.0 {
            lambda -= std::f64::consts::PI * sign(x) * sign(r0y);
        }
        DVec2::new(
            lambda / self.n,
            asin((self.c - (x * x + r0y * r0y) * self.n * self.n) / (2.0 * self.n)),
        )
    }
}

/// A raw spherical projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawProjection {
    ConicEqualArea(ConicEqualArea),
    /// Lambert cylindrical equal-area, stretched for the given standard parallel cosine.
    CylindricalEqualArea { cos_phi0: f64 },
    Equirectangular,
}

impl RawProjection {
    /// Conic equal-area for standard parallels `phi0` and `phi1` (radians).
    ///
    /// Parallels symmetric about the equator degenerate to a cylindrical equal-area projection.
    pub fn conic_equal_area(phi0: f64, phi1: f64) -> Self {
        let sy0 = phi0.sin();
        let n = (sy0 + phi1.sin()) / 2.0;
        if n.abs() < EPSILON {
            return Self::cylindrical_equal_area(phi0);
        }
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Self::ConicEqualArea(ConicEqualArea {
            n,
            c,
            r0: c.sqrt() / n,
        })
    }

    pub fn cylindrical_equal_area(phi0: f64) -> Self {
        Self::CylindricalEqualArea {
            cos_phi0: phi0.cos(),
        }
    }

    /// Projects `(λ, φ)` in radians onto the unscaled plane (y up).
    pub fn project(&self, lambda: f64, phi: f64) -> DVec2 {
        match self {
            Self::ConicEqualArea(conic) => conic.project(lambda, phi),
            Self::CylindricalEqualArea { cos_phi0 } => {
                DVec2::new(lambda * cos_phi0, phi.sin() / cos_phi0)
            }
            Self::Equirectangular => DVec2::new(lambda, phi),
        }
    }

    /// Inverse of [`RawProjection::project`].
    pub fn invert(&self, x: f64, y: f64) -> DVec2 {
        match self {
            Self::ConicEqualArea(conic) => conic.invert(x, y),
            Self::CylindricalEqualArea { cos_phi0 } => DVec2::new(x / cos_phi0, asin(y * cos_phi0)),
            Self::Equirectangular => DVec2::new(x, y),
        }
    }
}

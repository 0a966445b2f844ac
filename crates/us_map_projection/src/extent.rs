//! Axis-aligned rectangles in output (or scale-relative) space.
//!
//! [`Extent`] serves two roles: the pixel-space clip extent of a projection, and the
//! scale-relative rectangle an inset claims inside the composite.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extent {
    /// Top-left corner (smallest x and y).
    pub min: DVec2,
    /// Bottom-right corner (largest x and y).
    pub max: DVec2,
}

impl Extent {
    /// Creates an extent from its two corners.
    pub fn new(min: impl Into<DVec2>, max: impl Into<DVec2>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Creates an extent of half-size `half` centered on `center`.
    pub fn centered(center: DVec2, half: DVec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment test, as used when clipping projected points.
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Half-open containment test (`min <= p < max`), as used when dispatching inverse lookups.
    #[inline]
    pub fn contains_half_open(&self, p: DVec2) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// Maps a scale-relative extent into pixel space: `origin + corner * k`.
    pub fn scaled(&self, k: f64, origin: DVec2) -> Self {
        Self {
            min: origin + self.min * k,
            max: origin + self.max * k,
        }
    }

    /// Moves every edge inwards by `amount`.
    pub fn shrink(&self, amount: f64) -> Self {
        Self {
            min: self.min + DVec2::splat(amount),
            max: self.max - DVec2::splat(amount),
        }
    }
}

impl From<[[f64; 2]; 2]> for Extent {
    fn from(value: [[f64; 2]; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

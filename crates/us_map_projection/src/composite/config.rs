//! Fixed constants of the composite layout.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Base scale of a newly built composite.
pub const SCALE: f64 = 1100.0;
/// Reference viewport; a new composite is centered on half of it.
pub const VIEWBOX: DVec2 = DVec2::new(1024.0, 576.0);
/// Inset applied to each inset's pixel clip rectangle so neighbours never share an edge.
pub const EPSILON: f64 = 1e-6;
/// Offset of the primary projection's translate, as a fraction of scale.
pub const OFFSET: DVec2 = DVec2::new(0.02, -0.01);
/// Half-size of the primary projection's clip rectangle, as a fraction of scale.
pub const HALF_EXTENT: DVec2 = DVec2::new(0.4655, 0.262);

/// Layout constants of a [`crate::composite::UsMapProjection`], fixed at construction.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompositeConfig {
    /// Scale applied at construction.
    pub scale: f64,
    /// Viewport whose center becomes the initial translate.
    pub viewbox: DVec2,
    /// Seam inset for inset clip rectangles, in pixels.
    pub epsilon: f64,
    /// Primary translate offset `(dx, dy)`, relative to scale.
    pub offset: DVec2,
    /// Primary clip half-extent, relative to scale.
    pub half_extent: DVec2,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            scale: SCALE,
            viewbox: VIEWBOX,
            epsilon: EPSILON,
            offset: OFFSET,
            half_extent: HALF_EXTENT,
        }
    }
}

impl CompositeConfig {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_viewbox(mut self, viewbox: impl Into<DVec2>) -> Self {
        self.viewbox = viewbox.into();
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_offset(mut self, offset: impl Into<DVec2>) -> Self {
        self.offset = offset.into();
        self
    }

    pub fn with_half_extent(mut self, half_extent: impl Into<DVec2>) -> Self {
        self.half_extent = half_extent.into();
        self
    }

    /// Translate a new composite starts with.
    pub fn center(&self) -> DVec2 {
        self.viewbox / 2.0
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidConfig("scale must be finite and > 0".into()));
        }
        if !self.viewbox.is_finite() || self.viewbox.x <= 0.0 || self.viewbox.y <= 0.0 {
            return Err(Error::InvalidConfig(
                "viewbox must be finite and > 0 in both components".into(),
            ));
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(Error::InvalidConfig("epsilon must be finite and >= 0".into()));
        }
        if !self.offset.is_finite() {
            return Err(Error::InvalidConfig("offset must be finite".into()));
        }
        if !self.half_extent.is_finite() || self.half_extent.x <= 0.0 || self.half_extent.y <= 0.0
        {
            return Err(Error::InvalidConfig(
                "half_extent must be finite and > 0 in both components".into(),
            ));
        }
        Ok(())
    }
}

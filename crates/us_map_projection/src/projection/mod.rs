//! Configurable single projections.
//!
//! A [`Projection`] wraps a [`RawProjection`] with a rotation, a scale and translation
//! (anchored at a geographic center), an optional clip extent and a resampling precision.
//! It converts single points with [`Projection::project`] / [`Projection::invert`] and whole
//! geometries through [`Projection::stream`], which builds the pipeline
//!
//! ```text
//! degrees → rotate → antimeridian clip → project + resample → clip extent → sink
//! ```
//!
//! Setters come in two flavours: `set_*` mutates in place and returns `&mut Self`, `with_*`
//! consumes and returns the projection for builder-style construction.
use glam::{DVec2, DVec3};

pub mod clip;
pub mod raw;
mod resample;
pub mod rotation;

pub use raw::RawProjection;
pub use rotation::Rotation;

use crate::extent::Extent;
use crate::math::{DEGREES, RADIANS};
use crate::stream::GeoStream;
use clip::{ClipAntimeridian, ClipRectangle};
use resample::{ProjectTransform, Resample, ScaleTranslate};

const DEFAULT_SCALE: f64 = 150.0;
const DEFAULT_TRANSLATE: DVec2 = DVec2::new(480.0, 250.0);
const DEFAULT_DELTA2: f64 = 0.5;

/// First pipeline stage: converts degrees to radians and rotates.
struct Rotate<S: GeoStream> {
    rotation: Rotation,
    next: S,
}

impl<S: GeoStream> GeoStream for Rotate<S> {
    #[inline]
    fn point(&mut self, x: f64, y: f64) {
        let p = self.rotation.forward(x * RADIANS, y * RADIANS);
        self.next.point(p.x, p.y);
    }

    fn sphere(&mut self) {
        self.next.sphere();
    }

    fn line_start(&mut self) {
        self.next.line_start();
    }

    fn line_end(&mut self) {
        self.next.line_end();
    }

    fn polygon_start(&mut self) {
        self.next.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.next.polygon_end();
    }
}

/// A snapshot of a projection's point path: rotation, projection and clip-extent test.
///
/// This is what a streamed point goes through, without the line and polygon machinery, so
/// it can be evaluated through a shared reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStream {
    rotation: Rotation,
    project: ProjectTransform,
    clip: Option<Extent>,
}

impl PointStream {
    /// Projects `[lon, lat]` in degrees, returning `None` when the result falls outside the
    /// clip extent (edges inclusive).
    pub fn point(&self, lon: f64, lat: f64) -> Option<DVec2> {
        let r = self.rotation.forward(lon * RADIANS, lat * RADIANS);
        let p = self.project.project(r.x, r.y);
        match &self.clip {
            Some(extent) if !extent.contains(p) => None,
            _ => Some(p),
        }
    }

    pub fn clip_extent(&self) -> Option<Extent> {
        self.clip
    }
}

/// A raw projection with rotation, scale, translation, clipping and resampling applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    raw: RawProjection,
    /// Standard parallels in degrees, for the conic family.
    parallels: Option<DVec2>,
    scale: f64,
    translate: DVec2,
    /// Radians.
    center: DVec2,
    /// Radians.
    rotate: DVec3,
    clip_extent: Option<Extent>,
    delta2: f64,
    rotation: Rotation,
    transform: ProjectTransform,
}

impl Projection {
    /// Wraps `raw` with scale 150, translate `(480, 250)`, no rotation and no clip extent.
    pub fn new(raw: RawProjection) -> Self {
        let mut projection = Self {
            raw,
            parallels: None,
            scale: DEFAULT_SCALE,
            translate: DEFAULT_TRANSLATE,
            center: DVec2::ZERO,
            rotate: DVec3::ZERO,
            clip_extent: None,
            delta2: DEFAULT_DELTA2,
            rotation: Rotation::default(),
            transform: ProjectTransform {
                raw,
                transform: ScaleTranslate {
                    k: DEFAULT_SCALE,
                    dx: DEFAULT_TRANSLATE.x,
                    dy: DEFAULT_TRANSLATE.y,
                },
            },
        };
        projection.recenter();
        projection
    }

    /// Conic equal-area with standard parallels 0° and 60°.
    pub fn conic_equal_area() -> Self {
        let parallels = DVec2::new(0.0, 60.0);
        let raw = RawProjection::conic_equal_area(parallels.x * RADIANS, parallels.y * RADIANS);
        let mut projection = Self::new(raw);
        projection.parallels = Some(parallels);
        projection
            .with_scale(155.424)
            .with_center([0.0, 33.6442])
    }

    /// The standard Albers projection of the lower 48 states.
    pub fn albers() -> Self {
        Self::conic_equal_area()
            .with_parallels([29.5, 45.5])
            .with_scale(1070.0)
            .with_translate([480.0, 250.0])
            .with_rotate([96.0, 0.0, 0.0])
            .with_center([-0.6, 38.7])
    }

    /// Plate carrée.
    pub fn equirectangular() -> Self {
        Self::new(RawProjection::Equirectangular).with_scale(152.63)
    }

    fn recenter(&mut self) {
        let c = self.raw.project(self.center.x, self.center.y) * self.scale;
        self.transform = ProjectTransform {
            raw: self.raw,
            transform: ScaleTranslate {
                k: self.scale,
                dx: self.translate.x - c.x,
                dy: self.translate.y + c.y,
            },
        };
        self.rotation = Rotation::new(self.rotate.x, self.rotate.y, self.rotate.z);
    }

    pub fn raw(&self) -> RawProjection {
        self.raw
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.scale = scale;
        self.recenter();
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.set_scale(scale);
        self
    }

    /// Pixel position of the projection center.
    pub fn translate(&self) -> DVec2 {
        self.translate
    }

    pub fn set_translate(&mut self, translate: impl Into<DVec2>) -> &mut Self {
        self.translate = translate.into();
        self.recenter();
        self
    }

    pub fn with_translate(mut self, translate: impl Into<DVec2>) -> Self {
        self.set_translate(translate);
        self
    }

    /// Geographic center `[lon, lat]` in degrees.
    pub fn center(&self) -> DVec2 {
        self.center * DEGREES
    }

    /// Sets the geographic point placed at [`Projection::translate`]. Angles are taken modulo 360.
    pub fn set_center(&mut self, center: impl Into<DVec2>) -> &mut Self {
        let c = center.into();
        self.center = DVec2::new(c.x % 360.0, c.y % 360.0) * RADIANS;
        self.recenter();
        self
    }

    pub fn with_center(mut self, center: impl Into<DVec2>) -> Self {
        self.set_center(center);
        self
    }

    /// Rotation `[yaw, pitch, roll]` in degrees.
    pub fn rotate(&self) -> DVec3 {
        self.rotate * DEGREES
    }

    /// Sets the rotation `[yaw, pitch, roll]` in degrees, each taken modulo 360.
    pub fn set_rotate(&mut self, rotate: impl Into<DVec3>) -> &mut Self {
        let r = rotate.into();
        self.rotate = DVec3::new(r.x % 360.0, r.y % 360.0, r.z % 360.0) * RADIANS;
        self.recenter();
        self
    }

    pub fn with_rotate(mut self, rotate: impl Into<DVec3>) -> Self {
        self.set_rotate(rotate);
        self
    }

    /// Standard parallels in degrees, or `None` for non-conic projections.
    pub fn parallels(&self) -> Option<DVec2> {
        self.parallels
    }

    /// Replaces the standard parallels of a conic projection. Ignored for other projections.
    pub fn set_parallels(&mut self, parallels: impl Into<DVec2>) -> &mut Self {
        let parallels = parallels.into();
        if self.parallels.is_none() {
            tracing::warn!(?parallels, "parallels ignored on non-conic projection");
            return self;
        }
        self.parallels = Some(parallels);
        self.raw = RawProjection::conic_equal_area(parallels.x * RADIANS, parallels.y * RADIANS);
        self.recenter();
        self
    }

    pub fn with_parallels(mut self, parallels: impl Into<DVec2>) -> Self {
        self.set_parallels(parallels);
        self
    }

    pub fn clip_extent(&self) -> Option<Extent> {
        self.clip_extent
    }

    /// Sets the pixel rectangle streamed geometry is clipped to; `None` disables clipping.
    pub fn set_clip_extent(&mut self, extent: Option<Extent>) -> &mut Self {
        self.clip_extent = extent;
        self
    }

    pub fn with_clip_extent(mut self, extent: Option<Extent>) -> Self {
        self.set_clip_extent(extent);
        self
    }

    /// Resampling threshold in pixels; zero disables adaptive resampling.
    pub fn precision(&self) -> f64 {
        self.delta2.sqrt()
    }

    pub fn set_precision(&mut self, precision: f64) -> &mut Self {
        self.delta2 = precision * precision;
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.set_precision(precision);
        self
    }

    /// Projects `[lon, lat]` in degrees to pixels. The clip extent is not applied.
    pub fn project(&self, point: impl Into<DVec2>) -> DVec2 {
        let p = point.into() * RADIANS;
        let r = self.rotation.forward(p.x, p.y);
        self.transform.project(r.x, r.y)
    }

    /// Maps a pixel position back to `[lon, lat]` in degrees.
    pub fn invert(&self, point: impl Into<DVec2>) -> DVec2 {
        let p = point.into();
        let r = self.transform.invert(p.x, p.y);
        self.rotation.invert(r.x, r.y) * DEGREES
    }

    /// Builds a projection stream writing projected geometry into `sink`.
    ///
    /// Input coordinates are `[lon, lat]` in degrees.
    pub fn stream<'a, S: GeoStream + 'a>(&self, sink: S) -> Box<dyn GeoStream + 'a> {
        match self.clip_extent {
            Some(extent) => self.pipeline(ClipRectangle::new(extent, sink)),
            None => self.pipeline(sink),
        }
    }

    fn pipeline<'a, S: GeoStream + 'a>(&self, sink: S) -> Box<dyn GeoStream + 'a> {
        Box::new(Rotate {
            rotation: self.rotation,
            next: ClipAntimeridian::new(Resample::new(self.transform, self.delta2, sink)),
        })
    }

    /// Snapshot of the current point path, for per-point hit testing.
    pub fn point_stream(&self) -> PointStream {
        PointStream {
            rotation: self.rotation,
            project: self.transform,
            clip: self.clip_extent,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::albers()
    }
}

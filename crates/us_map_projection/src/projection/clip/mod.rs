//! Clipping stages of the projection stream pipeline.
//!
//! - [`ClipAntimeridian`] runs on rotated spherical coordinates (radians), before projecting,
//!   and cuts lines and rings where they cross ±180°.
//! - [`ClipRectangle`] runs on projected coordinates and keeps only what falls inside the
//!   projection's clip extent.
pub mod antimeridian;
pub mod rectangle;

pub use antimeridian::ClipAntimeridian;
pub use rectangle::ClipRectangle;

use glam::DVec2;

use crate::stream::GeoStream;

/// Collects the pieces a line clipper emits while clipping a polygon ring.
#[derive(Debug, Default)]
pub(crate) struct SegmentBuffer {
    segments: Vec<Vec<DVec2>>,
}

impl SegmentBuffer {
    pub(crate) fn take(&mut self) -> Vec<Vec<DVec2>> {
        std::mem::take(&mut self.segments)
    }
}

impl GeoStream for SegmentBuffer {
    fn point(&mut self, x: f64, y: f64) {
        if let Some(segment) = self.segments.last_mut() {
            segment.push(DVec2::new(x, y));
        }
    }

    fn line_start(&mut self) {
        self.segments.push(Vec::new());
    }
}

/// Emits closed rings as one polygon, opening it lazily so empty polygons emit nothing.
pub(crate) struct PolygonWriter {
    started: bool,
}

impl PolygonWriter {
    pub(crate) fn new() -> Self {
        Self { started: false }
    }

    pub(crate) fn ring<S: GeoStream + ?Sized>(&mut self, ring: &[DVec2], next: &mut S) {
        if ring.is_empty() {
            return;
        }
        if !self.started {
            next.polygon_start();
            self.started = true;
        }
        next.line_start();
        for p in ring {
            next.point(p.x, p.y);
        }
        next.line_end();
    }

    pub(crate) fn finish<S: GeoStream + ?Sized>(&mut self, next: &mut S) {
        if self.started {
            next.polygon_end();
            self.started = false;
        }
    }
}

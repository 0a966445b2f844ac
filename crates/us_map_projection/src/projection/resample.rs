//! Projecting streamed geometry with adaptive resampling.
//!
//! A straight segment between two projected vertices rarely matches the projected great-circle
//! arc between them. When precision is enabled, segments are subdivided recursively at the
//! spherical midpoint until the projected midpoint lies within the precision threshold of
//! the chord.
use glam::{DVec2, DVec3};

use crate::math::{asin, cartesian, EPSILON};
use crate::projection::raw::RawProjection;
use crate::stream::GeoStream;

const MAX_DEPTH: u32 = 16;
/// cos(30°): segments spanning a larger angle are always subdivided.
const COS_MIN_DISTANCE: f64 = 0.866_025_403_784_438_6;

/// Uniform scale and translation applied to raw coordinates (y flipped).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScaleTranslate {
    pub(crate) k: f64,
    pub(crate) dx: f64,
    pub(crate) dy: f64,
}

impl ScaleTranslate {
    #[inline]
    pub(crate) fn forward(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.dx + self.k * p.x, self.dy - self.k * p.y)
    }

    #[inline]
    pub(crate) fn invert(&self, p: DVec2) -> DVec2 {
        DVec2::new((p.x - self.dx) / self.k, (self.dy - p.y) / self.k)
    }
}

/// Raw projection followed by scale and translation. Input is rotated radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProjectTransform {
    pub(crate) raw: RawProjection,
    pub(crate) transform: ScaleTranslate,
}

impl ProjectTransform {
    #[inline]
    pub(crate) fn project(&self, lambda: f64, phi: f64) -> DVec2 {
        self.transform.forward(self.raw.project(lambda, phi))
    }

    #[inline]
    pub(crate) fn invert(&self, x: f64, y: f64) -> DVec2 {
        let p = self.transform.invert(DVec2::new(x, y));
        self.raw.invert(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy)]
struct Vertex {
    p: DVec2,
    lambda: f64,
    c: DVec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Point,
    Line,
    /// First vertex of a polygon ring, remembered to resample the closing segment.
    RingFirst,
}

/// Projection stage: projects each spherical point, inserting intermediate points along
/// lines and rings when precision is enabled.
pub(crate) struct Resample<S: GeoStream> {
    next: S,
    project: ProjectTransform,
    delta2: f64,
    mode: Mode,
    in_polygon: bool,
    prev: Option<Vertex>,
    first: Option<Vertex>,
}

impl<S: GeoStream> Resample<S> {
    /// `delta2` is the squared precision in pixels; zero disables resampling.
    pub(crate) fn new(project: ProjectTransform, delta2: f64, next: S) -> Self {
        Self {
            next,
            project,
            delta2,
            mode: Mode::Point,
            in_polygon: false,
            prev: None,
            first: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> S {
        self.next
    }

    fn vertex(&self, lambda: f64, phi: f64) -> Vertex {
        Vertex {
            p: self.project.project(lambda, phi),
            lambda,
            c: cartesian(lambda, phi),
        }
    }

    fn line_to(&mut self, v0: Vertex, v1: Vertex, depth: u32) {
        let d = v1.p - v0.p;
        let d2 = d.length_squared();
        if d2 <= 4.0 * self.delta2 || depth == 0 {
            return;
        }
        let depth = depth - 1;

        let sum = v0.c + v1.c;
        let m = sum.length();
        let c = sum / m;
        let phi2 = asin(c.z);
        let lambda2 = if (c.z.abs() - 1.0).abs() < EPSILON || (v0.lambda - v1.lambda).abs() < EPSILON
        {
            (v0.lambda + v1.lambda) / 2.0
        } else {
            sum.y.atan2(sum.x)
        };
        let p2 = self.project.project(lambda2, phi2);
        let d02 = p2 - v0.p;
        let dz = d.y * d02.x - d.x * d02.y;

        if dz * dz / d2 > self.delta2
            || (d.dot(d02) / d2 - 0.5).abs() > 0.3
            || v0.c.dot(v1.c) < COS_MIN_DISTANCE
        {
            let mid = Vertex {
                p: p2,
                lambda: lambda2,
                c,
            };
            self.line_to(v0, mid, depth);
            self.next.point(p2.x, p2.y);
            self.line_to(mid, v1, depth);
        }
    }

    fn line_point(&mut self, lambda: f64, phi: f64) -> Vertex {
        let v = self.vertex(lambda, phi);
        if let Some(prev) = self.prev {
            self.line_to(prev, v, MAX_DEPTH);
        }
        self.next.point(v.p.x, v.p.y);
        self.prev = Some(v);
        v
    }
}

impl<S: GeoStream> GeoStream for Resample<S> {
    fn point(&mut self, x: f64, y: f64) {
        if self.delta2 <= 0.0 {
            let p = self.project.project(x, y);
            self.next.point(p.x, p.y);
            return;
        }
        match self.mode {
            Mode::Point => {
                let p = self.project.project(x, y);
                self.next.point(p.x, p.y);
            }
            Mode::Line => {
                self.line_point(x, y);
            }
            Mode::RingFirst => {
                self.first = Some(self.line_point(x, y));
                self.mode = Mode::Line;
            }
        }
    }

    fn sphere(&mut self) {
        self.next.sphere();
    }

    fn line_start(&mut self) {
        self.prev = None;
        self.first = None;
        self.mode = if self.in_polygon {
            Mode::RingFirst
        } else {
            Mode::Line
        };
        self.next.line_start();
    }

    fn line_end(&mut self) {
        if self.in_polygon && self.delta2 > 0.0 {
            if let (Some(last), Some(first)) = (self.prev, self.first) {
                self.line_to(last, first, MAX_DEPTH);
            }
        }
        self.mode = Mode::Point;
        self.prev = None;
        self.first = None;
        self.next.line_end();
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
        self.next.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
        self.next.polygon_end();
    }
}

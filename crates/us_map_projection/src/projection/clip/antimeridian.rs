//! Cutting geometry along the antimeridian (λ = ±π) of the rotated sphere.
//!
//! Input and output are spherical `(λ, φ)` in radians. Points always pass. Lines are split
//! into separate runs wherever they cross the antimeridian or pass over a pole. Polygon rings
//! are cut the same way and every resulting piece is closed on its own: along the antimeridian
//! when it leaves and re-enters on the same side, across the pole otherwise. Rings that cross
//! the antimeridian more than twice are closed piecewise and may not nest exactly.
use std::f64::consts::PI;

use glam::DVec2;

use crate::math::{EPSILON, HALF_PI};
use crate::projection::clip::{PolygonWriter, SegmentBuffer};
use crate::stream::GeoStream;

/// Latitude where the great circle through two points crosses the antimeridian.
fn intersect(lambda0: f64, phi0: f64, lambda1: f64, phi1: f64) -> f64 {
    let sin_lambda0_lambda1 = (lambda0 - lambda1).sin();
    if sin_lambda0_lambda1.abs() > EPSILON {
        let cos_phi0 = phi0.cos();
        let cos_phi1 = phi1.cos();
        ((phi0.sin() * cos_phi1 * lambda1.sin() - phi1.sin() * cos_phi0 * lambda0.sin())
            / (cos_phi0 * cos_phi1 * sin_lambda0_lambda1))
            .atan()
    } else {
        (phi0 + phi1) / 2.0
    }
}

/// Walks along the clip boundary from `from` to `to`. With no endpoints, emits the
/// outline of the whole sphere.
fn interpolate(from_to: Option<(DVec2, DVec2)>, direction: f64, emit: &mut impl FnMut(f64, f64)) {
    match from_to {
        None => {
            let phi = direction * HALF_PI;
            emit(-PI, phi);
            emit(0.0, phi);
            emit(PI, phi);
            emit(PI, 0.0);
            emit(PI, -phi);
            emit(0.0, -phi);
            emit(-PI, -phi);
            emit(-PI, 0.0);
            emit(-PI, phi);
        }
        Some((from, to)) if (from.x - to.x).abs() > EPSILON => {
            let lambda = if from.x < to.x { PI } else { -PI };
            let phi = direction * lambda / 2.0;
            emit(-lambda, phi);
            emit(0.0, phi);
            emit(lambda, phi);
        }
        Some((_, to)) => emit(to.x, to.y),
    }
}

/// Line-cutting state machine shared by line and ring clipping.
#[derive(Debug)]
struct AntimeridianLine {
    lambda0: f64,
    phi0: f64,
    sign0: f64,
    clean: bool,
}

impl AntimeridianLine {
    fn new() -> Self {
        Self {
            lambda0: f64::NAN,
            phi0: f64::NAN,
            sign0: f64::NAN,
            clean: true,
        }
    }

    fn line_start<O: GeoStream + ?Sized>(&mut self, out: &mut O) {
        out.line_start();
        self.clean = true;
    }

    fn point<O: GeoStream + ?Sized>(&mut self, mut lambda1: f64, phi1: f64, out: &mut O) {
        let sign1 = if lambda1 > 0.0 { PI } else { -PI };
        let delta = (lambda1 - self.lambda0).abs();

        if (delta - PI).abs() < EPSILON {
            // Crosses a pole.
            self.phi0 = if (self.phi0 + phi1) / 2.0 > 0.0 {
                HALF_PI
            } else {
                -HALF_PI
            };
            out.point(self.lambda0, self.phi0);
            out.point(self.sign0, self.phi0);
            out.line_end();
            out.line_start();
            out.point(sign1, self.phi0);
            out.point(lambda1, self.phi0);
            self.clean = false;
        } else if self.sign0 != sign1 && delta >= PI {
            if (self.lambda0 - self.sign0).abs() < EPSILON {
                self.lambda0 -= self.sign0 * EPSILON;
            }
            if (lambda1 - sign1).abs() < EPSILON {
                lambda1 -= sign1 * EPSILON;
            }
            self.phi0 = intersect(self.lambda0, self.phi0, lambda1, phi1);
            out.point(self.sign0, self.phi0);
            out.line_end();
            out.line_start();
            out.point(sign1, self.phi0);
            self.clean = false;
        }

        self.lambda0 = lambda1;
        self.phi0 = phi1;
        out.point(lambda1, phi1);
        self.sign0 = sign1;
    }

    fn line_end<O: GeoStream + ?Sized>(&mut self, out: &mut O) {
        out.line_end();
        self.lambda0 = f64::NAN;
        self.phi0 = f64::NAN;
    }
}

/// Pre-projection clip stage cutting along the antimeridian.
pub struct ClipAntimeridian<S: GeoStream> {
    next: S,
    line: AntimeridianLine,
    in_line: bool,
    in_polygon: bool,
    ring: Vec<DVec2>,
    buffer: SegmentBuffer,
    polygon: PolygonWriter,
}

impl<S: GeoStream> ClipAntimeridian<S> {
    pub fn new(next: S) -> Self {
        Self {
            next,
            line: AntimeridianLine::new(),
            in_line: false,
            in_polygon: false,
            ring: Vec::new(),
            buffer: SegmentBuffer::default(),
            polygon: PolygonWriter::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.next
    }

    fn ring_end(&mut self) {
        if let Some(&first) = self.ring.first() {
            self.line.point(first.x, first.y, &mut self.buffer);
        }
        self.line.line_end(&mut self.buffer);
        self.ring.clear();

        let mut segments = self.buffer.take();
        if segments.is_empty() {
            return;
        }

        if self.line.clean {
            let segment = &segments[0];
            let m = segment.len().saturating_sub(1);
            if m > 0 {
                self.polygon.ring(&segment[..m], &mut self.next);
            }
            return;
        }

        // The ring started mid-piece: its last run continues into its first.
        if segments.len() > 1 {
            let head = segments.remove(0);
            if let Some(tail) = segments.last_mut() {
                let skip = usize::from(tail.last() == head.first());
                tail.extend(head.into_iter().skip(skip));
            }
        }

        for segment in segments.into_iter().filter(|s| s.len() > 1) {
            let (start, end) = (segment[0], segment[segment.len() - 1]);
            let mut closed = segment;
            interpolate(Some((end, start)), 1.0, &mut |x, y| {
                closed.push(DVec2::new(x, y));
            });
            self.polygon.ring(&closed, &mut self.next);
        }
    }
}

impl<S: GeoStream> GeoStream for ClipAntimeridian<S> {
    fn point(&mut self, x: f64, y: f64) {
        match (self.in_line, self.in_polygon) {
            (false, _) => self.next.point(x, y),
            (true, false) => self.line.point(x, y, &mut self.next),
            (true, true) => {
                self.ring.push(DVec2::new(x, y));
                self.line.point(x, y, &mut self.buffer);
            }
        }
    }

    fn sphere(&mut self) {
        let next = &mut self.next;
        next.polygon_start();
        next.line_start();
        interpolate(None, 1.0, &mut |x, y| next.point(x, y));
        next.line_end();
        next.polygon_end();
    }

    fn line_start(&mut self) {
        self.in_line = true;
        if self.in_polygon {
            self.ring.clear();
            self.line.line_start(&mut self.buffer);
        } else {
            self.line.line_start(&mut self.next);
        }
    }

    fn line_end(&mut self) {
        self.in_line = false;
        if self.in_polygon {
            self.ring_end();
        } else {
            self.line.line_end(&mut self.next);
        }
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
        self.polygon.finish(&mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::RADIANS;
    use crate::stream::{StreamEvent, VecStream};

    fn deg(lon: f64, lat: f64) -> (f64, f64) {
        (lon * RADIANS, lat * RADIANS)
    }

    #[test]
    fn points_pass_through_unchanged() {
        let mut clip = ClipAntimeridian::new(VecStream::new());
        clip.point(3.0, 1.0);
        let sink = clip.into_inner();
        assert_eq!(sink.as_slice(), &[StreamEvent::Point(DVec2::new(3.0, 1.0))]);
    }

    #[test]
    fn line_not_crossing_is_untouched() {
        let mut clip = ClipAntimeridian::new(VecStream::new());
        clip.line_start();
        for (l, p) in [deg(-10.0, 0.0), deg(0.0, 5.0), deg(10.0, 0.0)] {
            clip.point(l, p);
        }
        clip.line_end();
        let sink = clip.into_inner();
        assert_eq!(sink.count(StreamEvent::LineStart), 1);
        assert_eq!(sink.points().len(), 3);
    }

    #[test]
    fn line_crossing_antimeridian_is_split() {
        let mut clip = ClipAntimeridian::new(VecStream::new());
        clip.line_start();
        let (l0, p0) = deg(170.0, 10.0);
        let (l1, p1) = deg(-170.0, 10.0);
        clip.point(l0, p0);
        clip.point(l1, p1);
        clip.line_end();
        let sink = clip.into_inner();
        assert_eq!(sink.count(StreamEvent::LineStart), 2);
        assert_eq!(sink.count(StreamEvent::LineEnd), 2);
        let pts = sink.points();
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[1].x, PI);
        assert_eq!(pts[2].x, -PI);
        // Symmetric endpoints cross at their shared latitude or slightly poleward.
        assert!(pts[1].y >= p0 - 1e-12);
        assert_eq!(pts[1].y, pts[2].y);
    }

    #[test]
    fn clean_ring_drops_closing_point() {
        let mut clip = ClipAntimeridian::new(VecStream::new());
        clip.polygon_start();
        clip.line_start();
        for (l, p) in [deg(0.0, 0.0), deg(10.0, 0.0), deg(10.0, 10.0), deg(0.0, 10.0)] {
            clip.point(l, p);
        }
        clip.line_end();
        clip.polygon_end();
        let sink = clip.into_inner();
        assert_eq!(sink.count(StreamEvent::PolygonStart), 1);
        assert_eq!(sink.count(StreamEvent::PolygonEnd), 1);
        assert_eq!(sink.points().len(), 4);
    }

    #[test]
    fn ring_crossing_antimeridian_becomes_two_closed_rings() {
        let mut clip = ClipAntimeridian::new(VecStream::new());
        clip.polygon_start();
        clip.line_start();
        for (l, p) in [
            deg(170.0, -10.0),
            deg(-170.0, -10.0),
            deg(-170.0, 10.0),
            deg(170.0, 10.0),
        ] {
            clip.point(l, p);
        }
        clip.line_end();
        clip.polygon_end();
        let sink = clip.into_inner();
        assert_eq!(sink.count(StreamEvent::PolygonStart), 1);
        assert_eq!(sink.count(StreamEvent::LineStart), 2);
        for p in sink.points() {
            assert!(p.x.abs() <= PI);
        }
    }

    #[test]
    fn empty_polygon_emits_nothing() {
        let mut clip = ClipAntimeridian::new(VecStream::new());
        clip.polygon_start();
        clip.line_start();
        clip.line_end();
        clip.polygon_end();
        assert!(clip.into_inner().is_empty());
    }

    #[test]
    fn sphere_becomes_outline_polygon() {
        let mut clip = ClipAntimeridian::new(VecStream::new());
        clip.sphere();
        let sink = clip.into_inner();
        assert_eq!(sink.count(StreamEvent::PolygonStart), 1);
        assert_eq!(sink.points().len(), 9);
        assert_eq!(sink.count(StreamEvent::Sphere), 0);
    }
}

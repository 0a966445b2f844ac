//! Clipping projected geometry to a rectangular extent.
//!
//! Points are kept when inside the extent (edges inclusive). Lines are clipped segment by
//! segment (Liang–Barsky) and split into separate runs each time they leave and re-enter.
//! Polygon rings are clipped Sutherland–Hodgman style, which keeps them closed; rings that
//! collapse below three vertices are dropped.
use glam::DVec2;

use crate::extent::Extent;
use crate::projection::clip::PolygonWriter;
use crate::stream::GeoStream;

const CLIP_MAX: f64 = 1e9;
const CLIP_MIN: f64 = -CLIP_MAX;

/// Clips segment `a`–`b` to `extent`, returning the visible part.
pub(crate) fn clip_line(a: DVec2, b: DVec2, extent: &Extent) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    // Each edge as (signed distance from a, direction component, edge is a minimum).
    let edges = [
        (extent.min.x - a.x, d.x, true),
        (extent.max.x - a.x, d.x, false),
        (extent.min.y - a.y, d.y, true),
        (extent.max.y - a.y, d.y, false),
    ];

    for (r, delta, is_min) in edges {
        if delta == 0.0 {
            if (is_min && r > 0.0) || (!is_min && r < 0.0) {
                return None;
            }
            continue;
        }
        let r = r / delta;
        // Entering when moving towards the inside of this edge.
        let entering = (delta > 0.0) == is_min;
        if entering {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }

    let start = if t0 > 0.0 { a + d * t0 } else { a };
    let end = if t1 < 1.0 { a + d * t1 } else { b };
    Some((start, end))
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    fn inside(self, p: DVec2, extent: &Extent) -> bool {
        match self {
            Edge::Left => p.x >= extent.min.x,
            Edge::Right => p.x <= extent.max.x,
            Edge::Top => p.y >= extent.min.y,
            Edge::Bottom => p.y <= extent.max.y,
        }
    }

    fn intersect(self, a: DVec2, b: DVec2, extent: &Extent) -> DVec2 {
        let t = match self {
            Edge::Left => (extent.min.x - a.x) / (b.x - a.x),
            Edge::Right => (extent.max.x - a.x) / (b.x - a.x),
            Edge::Top => (extent.min.y - a.y) / (b.y - a.y),
            Edge::Bottom => (extent.max.y - a.y) / (b.y - a.y),
        };
        a + (b - a) * t
    }
}

/// Clips a closed ring (no duplicate closing vertex) to `extent`.
pub(crate) fn clip_ring(ring: &[DVec2], extent: &Extent) -> Vec<DVec2> {
    let mut out = ring.to_vec();
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        let input = std::mem::take(&mut out);
        let Some(&last) = input.last() else {
            break;
        };
        let mut prev = last;
        for &cur in &input {
            let cur_in = edge.inside(cur, extent);
            let prev_in = edge.inside(prev, extent);
            if cur_in {
                if !prev_in {
                    out.push(edge.intersect(prev, cur, extent));
                }
                out.push(cur);
            } else if prev_in {
                out.push(edge.intersect(prev, cur, extent));
            }
            prev = cur;
        }
    }
    out
}

/// Post-projection clip stage keeping geometry inside an extent.
pub struct ClipRectangle<S: GeoStream> {
    next: S,
    extent: Extent,
    in_line: bool,
    in_polygon: bool,
    first: bool,
    prev: DVec2,
    prev_visible: bool,
    ring: Vec<DVec2>,
    polygon: PolygonWriter,
}

impl<S: GeoStream> ClipRectangle<S> {
    pub fn new(extent: Extent, next: S) -> Self {
        Self {
            next,
            extent,
            in_line: false,
            in_polygon: false,
            first: true,
            prev: DVec2::NAN,
            prev_visible: false,
            ring: Vec::new(),
            polygon: PolygonWriter::new(),
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn into_inner(self) -> S {
        self.next
    }

    fn line_point(&mut self, p: DVec2) {
        let visible = self.extent.contains(p);
        if self.first {
            self.first = false;
            if visible {
                self.next.line_start();
                self.next.point(p.x, p.y);
            }
        } else if visible && self.prev_visible {
            self.next.point(p.x, p.y);
        } else {
            let a = self.prev.clamp(DVec2::splat(CLIP_MIN), DVec2::splat(CLIP_MAX));
            let b = p.clamp(DVec2::splat(CLIP_MIN), DVec2::splat(CLIP_MAX));
            if let Some((a, b)) = clip_line(a, b, &self.extent) {
                if !self.prev_visible {
                    self.next.line_start();
                    self.next.point(a.x, a.y);
                }
                self.next.point(b.x, b.y);
                if !visible {
                    self.next.line_end();
                }
            } else if visible {
                self.next.line_start();
                self.next.point(p.x, p.y);
            }
        }
        self.prev = p;
        self.prev_visible = visible;
    }
}

impl<S: GeoStream> GeoStream for ClipRectangle<S> {
    fn point(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, y);
        match (self.in_line, self.in_polygon) {
            (false, _) => {
                if self.extent.contains(p) {
                    self.next.point(x, y);
                }
            }
            (true, false) => self.line_point(p),
            (true, true) => self.ring.push(p),
        }
    }

    fn sphere(&mut self) {
        self.next.sphere();
    }

    fn line_start(&mut self) {
        self.in_line = true;
        if self.in_polygon {
            self.ring.clear();
        } else {
            self.first = true;
            self.prev = DVec2::NAN;
            self.prev_visible = false;
        }
    }

    fn line_end(&mut self) {
        self.in_line = false;
        if self.in_polygon {
            let clipped = clip_ring(&self.ring, &self.extent);
            self.ring.clear();
            if clipped.len() >= 3 {
                self.polygon.ring(&clipped, &mut self.next);
            }
        } else if self.prev_visible {
            self.next.line_end();
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
    use crate::stream::{StreamEvent, VecStream};

    fn unit_box() -> Extent {
        Extent::new([0.0, 0.0], [10.0, 10.0])
    }

    #[test]
    fn clip_line_trims_both_ends() {
        let (a, b) = clip_line(DVec2::new(-5.0, 5.0), DVec2::new(15.0, 5.0), &unit_box())
            .expect("segment crosses box");
        assert_eq!(a, DVec2::new(0.0, 5.0));
        assert_eq!(b, DVec2::new(10.0, 5.0));
    }

    #[test]
    fn clip_line_rejects_outside_segments() {
        assert!(clip_line(DVec2::new(-5.0, -1.0), DVec2::new(15.0, -1.0), &unit_box()).is_none());
        assert!(clip_line(DVec2::new(11.0, 0.0), DVec2::new(11.0, 10.0), &unit_box()).is_none());
    }

    #[test]
    fn clip_line_keeps_inside_segment() {
        let a = DVec2::new(1.0, 2.0);
        let b = DVec2::new(3.0, 4.0);
        assert_eq!(clip_line(a, b, &unit_box()), Some((a, b)));
    }

    #[test]
    fn points_outside_are_dropped() {
        let mut clip = ClipRectangle::new(unit_box(), VecStream::new());
        clip.point(5.0, 5.0);
        clip.point(10.0, 10.0);
        clip.point(10.5, 5.0);
        assert_eq!(clip.into_inner().points().len(), 2);
    }

    #[test]
    fn line_leaving_and_reentering_is_split() {
        let mut clip = ClipRectangle::new(unit_box(), VecStream::new());
        clip.line_start();
        for (x, y) in [(2.0, 2.0), (2.0, 20.0), (8.0, 20.0), (8.0, 2.0)] {
            clip.point(x, y);
        }
        clip.line_end();
        let sink = clip.into_inner();
        assert_eq!(sink.count(StreamEvent::LineStart), 2);
        assert_eq!(sink.count(StreamEvent::LineEnd), 2);
        assert_eq!(
            sink.points(),
            vec![
                DVec2::new(2.0, 2.0),
                DVec2::new(2.0, 10.0),
                DVec2::new(8.0, 10.0),
                DVec2::new(8.0, 2.0),
            ]
        );
    }

    #[test]
    fn line_entirely_outside_emits_nothing() {
        let mut clip = ClipRectangle::new(unit_box(), VecStream::new());
        clip.line_start();
        clip.point(-5.0, -5.0);
        clip.point(-1.0, -7.0);
        clip.line_end();
        assert!(clip.into_inner().is_empty());
    }

    #[test]
    fn ring_is_clipped_to_box() {
        let ring = [
            DVec2::new(-5.0, -5.0),
            DVec2::new(5.0, -5.0),
            DVec2::new(5.0, 5.0),
            DVec2::new(-5.0, 5.0),
        ];
        let clipped = clip_ring(&ring, &unit_box());
        assert_eq!(clipped.len(), 4);
        for p in &clipped {
            assert!(unit_box().contains(*p));
        }
        assert!(clipped.contains(&DVec2::new(5.0, 5.0)));
        assert!(clipped.contains(&DVec2::new(0.0, 0.0)));
    }

    #[test]
    fn polygon_covering_box_becomes_box() {
        let mut clip = ClipRectangle::new(unit_box(), VecStream::new());
        clip.polygon_start();
        clip.line_start();
        for (x, y) in [(-50.0, -50.0), (50.0, -50.0), (50.0, 50.0), (-50.0, 50.0)] {
            clip.point(x, y);
        }
        clip.line_end();
        clip.polygon_end();
        let sink = clip.into_inner();
        assert_eq!(sink.count(StreamEvent::PolygonStart), 1);
        assert_eq!(sink.points().len(), 4);
    }

    #[test]
    fn polygon_outside_box_emits_nothing() {
        let mut clip = ClipRectangle::new(unit_box(), VecStream::new());
        clip.polygon_start();
        clip.line_start();
        for (x, y) in [(20.0, 20.0), (30.0, 20.0), (30.0, 30.0)] {
            clip.point(x, y);
        }
        clip.line_end();
        clip.polygon_end();
        assert!(clip.into_inner().is_empty());
    }
}

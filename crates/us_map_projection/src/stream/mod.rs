//! Push-based geometry streams.
//!
//! A [`GeoStream`] receives the point / line / polygon lifecycle of a geometry one call at a
//! time. Projections wrap a caller's stream in a pipeline of stages (rotation, clipping,
//! resampling) and composites fan one stream out to several projections via [`Multiplex`].
//!
//! Sinks that must be shared by several pipelines are held as a [`SharedStream`]; its `Rc`
//! address is the identity a composite uses to memoize the stream it builds.
use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;

pub mod geometry;
pub mod multiplex;

pub use geometry::{stream_geometry, stream_sphere, GeoStreamable};
pub use multiplex::Multiplex;

/// A geometry sink receiving point, line and polygon lifecycle callbacks.
pub trait GeoStream {
    fn point(&mut self, x: f64, y: f64);

    fn sphere(&mut self) {}

    fn line_start(&mut self) {}

    fn line_end(&mut self) {}

    fn polygon_start(&mut self) {}

    fn polygon_end(&mut self) {}
}

/// A sink instance shared between pipelines. Identity is the `Rc` allocation.
pub type SharedStream = Rc<RefCell<dyn GeoStream>>;

/// Wraps a stream for sharing. Keep the typed handle to read results back afterwards.
pub fn shared<S: GeoStream + 'static>(stream: S) -> Rc<RefCell<S>> {
    Rc::new(RefCell::new(stream))
}

/// Returns `true` if both handles refer to the same sink instance.
#[inline]
pub fn same_stream(a: &SharedStream, b: &SharedStream) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A no-op stream.
impl GeoStream for () {
    #[inline]
    fn point(&mut self, _x: f64, _y: f64) {}
}

impl<S: GeoStream + ?Sized> GeoStream for Box<S> {
    #[inline]
    fn point(&mut self, x: f64, y: f64) {
        (**self).point(x, y);
    }

    fn sphere(&mut self) {
        (**self).sphere();
    }

    fn line_start(&mut self) {
        (**self).line_start();
    }

    fn line_end(&mut self) {
        (**self).line_end();
    }

    fn polygon_start(&mut self) {
        (**self).polygon_start();
    }

    fn polygon_end(&mut self) {
        (**self).polygon_end();
    }
}

impl<S: GeoStream + ?Sized> GeoStream for &mut S {
    #[inline]
    fn point(&mut self, x: f64, y: f64) {
        (**self).point(x, y);
    }

    fn sphere(&mut self) {
        (**self).sphere();
    }

    fn line_start(&mut self) {
        (**self).line_start();
    }

    fn line_end(&mut self) {
        (**self).line_end();
    }

    fn polygon_start(&mut self) {
        (**self).polygon_start();
    }

    fn polygon_end(&mut self) {
        (**self).polygon_end();
    }
}

impl<S: GeoStream + ?Sized> GeoStream for Rc<RefCell<S>> {
    #[inline]
    fn point(&mut self, x: f64, y: f64) {
        self.borrow_mut().point(x, y);
    }

    fn sphere(&mut self) {
        self.borrow_mut().sphere();
    }

    fn line_start(&mut self) {
        self.borrow_mut().line_start();
    }

    fn line_end(&mut self) {
        self.borrow_mut().line_end();
    }

    fn polygon_start(&mut self) {
        self.borrow_mut().polygon_start();
    }

    fn polygon_end(&mut self) {
        self.borrow_mut().polygon_end();
    }
}

/// A single recorded stream callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamEvent {
    Point(DVec2),
    Sphere,
    LineStart,
    LineEnd,
    PolygonStart,
    PolygonEnd,
}

/// A stream that records every callback in a `Vec`.
#[derive(Debug, Default)]
pub struct VecStream {
    events: Vec<StreamEvent>,
}

impl VecStream {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<StreamEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[StreamEvent] {
        &self.events
    }

    /// All recorded points, in order.
    pub fn points(&self) -> Vec<DVec2> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Point(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded events equal to `event` (points compare by value).
    pub fn count(&self, event: StreamEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl GeoStream for VecStream {
    #[inline]
    fn point(&mut self, x: f64, y: f64) {
        self.events.push(StreamEvent::Point(DVec2::new(x, y)));
    }

    fn sphere(&mut self) {
        self.events.push(StreamEvent::Sphere);
    }

    fn line_start(&mut self) {
        self.events.push(StreamEvent::LineStart);
    }

    fn line_end(&mut self) {
        self.events.push(StreamEvent::LineEnd);
    }

    fn polygon_start(&mut self) {
        self.events.push(StreamEvent::PolygonStart);
    }

    fn polygon_end(&mut self) {
        self.events.push(StreamEvent::PolygonEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_stream_records_lifecycle() {
        let mut sink = VecStream::with_capacity(4);
        assert!(sink.is_empty());
        sink.line_start();
        sink.point(1.0, 2.0);
        sink.point(3.0, 4.0);
        sink.line_end();
        assert_eq!(sink.len(), 4);
        assert_eq!(sink.points(), vec![DVec2::new(1.0, 2.0), DVec2::new(3.0, 4.0)]);
        assert_eq!(sink.count(StreamEvent::LineStart), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn shared_handle_forwards_to_inner_stream() {
        let sink = shared(VecStream::new());
        let mut handle: SharedStream = sink.clone();
        handle.polygon_start();
        handle.sphere();
        handle.polygon_end();
        assert_eq!(
            sink.borrow().as_slice(),
            &[
                StreamEvent::PolygonStart,
                StreamEvent::Sphere,
                StreamEvent::PolygonEnd
            ]
        );
    }

    #[test]
    fn same_stream_compares_identity_not_contents() {
        let a: SharedStream = shared(VecStream::new());
        let b: SharedStream = shared(VecStream::new());
        let a2 = a.clone();
        assert!(same_stream(&a, &a2));
        assert!(!same_stream(&a, &b));
    }

    #[test]
    fn unit_stream_ignores_everything() {
        let mut sink = ();
        sink.line_start();
        sink.point(0.0, 0.0);
        sink.line_end();
    }
}

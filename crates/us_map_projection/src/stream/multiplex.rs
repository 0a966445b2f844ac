//! Fan-out stream forwarding each callback to several streams.
use crate::stream::GeoStream;

/// Fan-out stream that forwards each callback to all contained streams, in order.
///
/// Calls are forwarded synchronously with no buffering, so every stream sees the exact
/// same sequence of events.
pub struct Multiplex<S: GeoStream = Box<dyn GeoStream>> {
    pub(crate) streams: Vec<S>,
}

impl<S: GeoStream> Multiplex<S> {
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
        }
    }

    pub fn with_streams(streams: Vec<S>) -> Self {
        Self { streams }
    }

    pub fn push(&mut self, stream: S) {
        self.streams.push(stream);
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.streams
    }
}

impl<S: GeoStream> Default for Multiplex<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GeoStream> std::fmt::Debug for Multiplex<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multiplex")
            .field("streams", &self.streams.len())
            .finish()
    }
}

impl<S: GeoStream> GeoStream for Multiplex<S> {
    fn point(&mut self, x: f64, y: f64) {
        for s in &mut self.streams {
            s.point(x, y);
        }
    }

    fn sphere(&mut self) {
        for s in &mut self.streams {
            s.sphere();
        }
    }

    fn line_start(&mut self) {
        for s in &mut self.streams {
            s.line_start();
        }
    }

    fn line_end(&mut self) {
        for s in &mut self.streams {
            s.line_end();
        }
    }

    fn polygon_start(&mut self) {
        for s in &mut self.streams {
            s.polygon_start();
        }
    }

    fn polygon_end(&mut self) {
        for s in &mut self.streams {
            s.polygon_end();
        }
    }
}

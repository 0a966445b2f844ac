//! Streaming `geo-types` geometries into a [`GeoStream`].
//!
//! Coordinates are `(x, y) = (longitude, latitude)` in degrees. Polygon rings are streamed
//! without their closing duplicate point; the ring lifecycle (`line_start`/`line_end` inside
//! `polygon_start`/`polygon_end`) implies closure.
use geo_types::{
    Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Rect, Triangle,
};

use crate::stream::GeoStream;

/// Geometry that can replay itself into a [`GeoStream`].
pub trait GeoStreamable {
    fn stream_to(&self, stream: &mut dyn GeoStream);
}

/// Streams any geometry into `stream`.
pub fn stream_geometry<G: GeoStreamable + ?Sized>(geometry: &G, stream: &mut dyn GeoStream) {
    geometry.stream_to(stream);
}

/// Streams the whole sphere.
pub fn stream_sphere(stream: &mut dyn GeoStream) {
    stream.sphere();
}

fn stream_line(coords: &[Coord<f64>], closed: bool, stream: &mut dyn GeoStream) {
    let n = match (closed, coords.first(), coords.last()) {
        (true, Some(first), Some(last)) if coords.len() > 1 && first == last => coords.len() - 1,
        _ => coords.len(),
    };
    stream.line_start();
    for c in &coords[..n] {
        stream.point(c.x, c.y);
    }
    stream.line_end();
}

fn stream_polygon(polygon: &Polygon<f64>, stream: &mut dyn GeoStream) {
    stream.polygon_start();
    stream_line(&polygon.exterior().0, true, stream);
    for ring in polygon.interiors() {
        stream_line(&ring.0, true, stream);
    }
    stream.polygon_end();
}

impl GeoStreamable for Point<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        stream.point(self.x(), self.y());
    }
}

impl GeoStreamable for MultiPoint<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        for p in &self.0 {
            p.stream_to(stream);
        }
    }
}

impl GeoStreamable for Line<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        stream_line(&[self.start, self.end], false, stream);
    }
}

impl GeoStreamable for LineString<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        stream_line(&self.0, false, stream);
    }
}

impl GeoStreamable for MultiLineString<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        for line in &self.0 {
            line.stream_to(stream);
        }
    }
}

impl GeoStreamable for Polygon<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        stream_polygon(self, stream);
    }
}

impl GeoStreamable for MultiPolygon<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        for polygon in &self.0 {
            stream_polygon(polygon, stream);
        }
    }
}

impl GeoStreamable for Rect<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        stream_polygon(&self.to_polygon(), stream);
    }
}

impl GeoStreamable for Triangle<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        stream_polygon(&self.to_polygon(), stream);
    }
}

impl GeoStreamable for GeometryCollection<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        for geometry in &self.0 {
            geometry.stream_to(stream);
        }
    }
}

impl GeoStreamable for Geometry<f64> {
    fn stream_to(&self, stream: &mut dyn GeoStream) {
        match self {
            Geometry::Point(g) => g.stream_to(stream),
            Geometry::Line(g) => g.stream_to(stream),
            Geometry::LineString(g) => g.stream_to(stream),
            Geometry::Polygon(g) => g.stream_to(stream),
            Geometry::MultiPoint(g) => g.stream_to(stream),
            Geometry::MultiLineString(g) => g.stream_to(stream),
            Geometry::MultiPolygon(g) => g.stream_to(stream),
            Geometry::GeometryCollection(g) => g.stream_to(stream),
            Geometry::Rect(g) => g.stream_to(stream),
            Geometry::Triangle(g) => g.stream_to(stream),
        }
    }
}

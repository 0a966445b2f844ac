//! Rasterizing projected geometry into PNG images.
use std::path::Path;

use geo_types::{LineString, MultiLineString};
use glam::DVec2;
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;
use us_map_projection::prelude::{Extent, GeoStream};

/// Installs a formatting subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init();
}

/// Output image settings.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    pub stroke: [u8; 3],
    /// Half-size in pixels of the square drawn for a bare point.
    pub point_radius: i32,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [255, 255, 255],
            stroke: [0, 0, 0],
            point_radius: 2,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_stroke(mut self, stroke: [u8; 3]) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_point_radius(mut self, point_radius: i32) -> Self {
        self.point_radius = point_radius;
        self
    }
}

/// A raster sink: lines and ring outlines are stroked, bare points drawn as small squares.
pub struct Canvas {
    image: RgbImage,
    config: RenderConfig,
    in_line: bool,
    in_polygon: bool,
    ring_start: Option<DVec2>,
    prev: Option<DVec2>,
    points: usize,
}

impl Canvas {
    pub fn new(config: RenderConfig) -> Self {
        let (w, h) = config.image_size;
        Self {
            image: RgbImage::from_pixel(w, h, Rgb(config.background)),
            config,
            in_line: false,
            in_polygon: false,
            ring_start: None,
            prev: None,
            points: 0,
        }
    }

    /// Changes the color used by subsequent drawing.
    pub fn set_stroke(&mut self, stroke: [u8; 3]) {
        self.config.stroke = stroke;
    }

    /// Number of points received so far.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Outlines a pixel-space rectangle.
    pub fn outline(&mut self, extent: &Extent) {
        let corners = [
            extent.min,
            DVec2::new(extent.max.x, extent.min.y),
            extent.max,
            DVec2::new(extent.min.x, extent.max.y),
        ];
        for i in 0..corners.len() {
            self.segment(corners[i], corners[(i + 1) % corners.len()]);
        }
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        info!(path = %path.display(), points = self.points, "wrote image");
        Ok(())
    }

    fn plot(&mut self, x: i64, y: i64) {
        let (w, h) = self.config.image_size;
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            self.image.put_pixel(x as u32, y as u32, Rgb(self.config.stroke));
        }
    }

    fn segment(&mut self, a: DVec2, b: DVec2) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        let steps = (b - a).abs().max_element().ceil().max(1.0) as usize;
        // Bail out on segments far off-canvas.
        if steps > 1 << 16 {
            return;
        }
        for i in 0..=steps {
            let p = a.lerp(b, i as f64 / steps as f64);
            self.plot(p.x.round() as i64, p.y.round() as i64);
        }
    }

    fn dot(&mut self, p: DVec2) {
        let r = i64::from(self.config.point_radius);
        let (cx, cy) = (p.x.round() as i64, p.y.round() as i64);
        for dy in -r..=r {
            for dx in -r..=r {
                self.plot(cx + dx, cy + dy);
            }
        }
    }
}

impl GeoStream for Canvas {
    fn point(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, y);
        self.points += 1;
        if !self.in_line {
            self.dot(p);
            return;
        }
        match self.prev {
            Some(prev) => self.segment(prev, p),
            None => self.ring_start = Some(p),
        }
        self.prev = Some(p);
    }

    fn line_start(&mut self) {
        self.in_line = true;
        self.prev = None;
        self.ring_start = None;
    }

    fn line_end(&mut self) {
        if self.in_polygon {
            if let (Some(prev), Some(start)) = (self.prev, self.ring_start) {
                self.segment(prev, start);
            }
        }
        self.in_line = false;
        self.prev = None;
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
    }
}

/// Meridians and parallels every `step` degrees, sampled every degree.
pub fn graticule(step: f64) -> MultiLineString<f64> {
    let step = step.max(1.0);
    let mut lines = Vec::new();

    let mut lon = -180.0;
    while lon < 180.0 {
        let coords: Vec<(f64, f64)> = (-80..=80).map(|lat| (lon, f64::from(lat))).collect();
        lines.push(LineString::from(coords));
        lon += step;
    }

    let mut lat = -80.0;
    while lat <= 80.0 {
        let coords: Vec<(f64, f64)> = (-180..=180).map(|lon| (f64::from(lon), lat)).collect();
        lines.push(LineString::from(coords));
        lat += step;
    }

    MultiLineString::new(lines)
}

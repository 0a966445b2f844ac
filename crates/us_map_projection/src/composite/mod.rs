//! The composite projection of the United States.
//!
//! [`UsMapProjection`] combines the Albers projection of the contiguous states with a set of
//! insets, each an independently rotated and scaled projection moved into a reserved rectangle
//! of the same output space. Forward projection lets every sub-projection try the point and
//! keeps the one whose clip rectangle captured it; inverse projection picks the sub-projection
//! by which inset rectangle contains the pixel.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::DVec2;
use tracing::{debug, trace, warn};

pub mod config;
pub mod inset;
pub mod scopes;

pub use config::CompositeConfig;
pub use inset::{inset_data, inset_states, make_insets, Inset, InsetKind, INSET_FIPS};
pub use scopes::Scope;

use crate::error::Result;
use crate::extent::Extent;
use crate::projection::{PointStream, Projection};
use crate::stream::{same_stream, GeoStreamable, Multiplex, SharedStream};

/// The multiplexed stream returned by [`UsMapProjection::stream`].
pub type CompositeStream = Rc<RefCell<Multiplex>>;

struct StreamCache {
    sink: SharedStream,
    stream: CompositeStream,
}

/// Albers projection of the lower 48 states with insets for Alaska, Hawaii and the insular
/// areas.
///
/// Query methods read the current state; `set_*` methods mutate in place and return
/// `&mut Self`; `with_*` methods consume and return the projection.
pub struct UsMapProjection {
    config: CompositeConfig,
    lower48: Projection,
    point: PointStream,
    insets: Vec<Inset>,
    cache: Option<StreamCache>,
}

impl UsMapProjection {
    /// Builds a composite with the insets activated by the given FIPS codes.
    ///
    /// Codes without an inset are ignored, so any list of state codes is accepted.
    pub fn new<S: AsRef<str>>(codes: &[S]) -> Self {
        Self::build(codes, CompositeConfig::default())
    }

    pub fn try_with_config<S: AsRef<str>>(codes: &[S], config: CompositeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(codes, config))
    }

    pub fn with_config<S: AsRef<str>>(codes: &[S], config: CompositeConfig) -> Self {
        debug_assert!(
            config.scale.is_finite() && config.scale > 0.0,
            "scale must be finite and > 0"
        );
        debug_assert!(
            config.viewbox.x > 0.0 && config.viewbox.y > 0.0,
            "viewbox must be > 0 in both components"
        );
        debug_assert!(config.epsilon >= 0.0, "epsilon must be >= 0");
        Self::build(codes, config)
    }

    /// The contiguous states only, without insets.
    pub fn lower48() -> Self {
        Self::new::<&str>(&[])
    }

    pub fn from_scope(scope: Scope) -> Self {
        Self::new(&scope.codes())
    }

    fn build<S: AsRef<str>>(codes: &[S], config: CompositeConfig) -> Self {
        let states = inset_states(codes);
        let insets = make_insets(inset_data(), &states);
        let lower48 = Projection::albers();
        let point = lower48.point_stream();
        let mut projection = Self {
            config,
            lower48,
            point,
            insets,
            cache: None,
        };
        projection
            .set_scale(config.scale)
            .set_translate(config.center());
        debug!(
            insets = ?projection.insets.iter().map(|i| i.id).collect::<Vec<_>>(),
            scale = config.scale,
            "built composite projection"
        );
        projection
    }

    /// Projects `[lon, lat]` in degrees, or `None` when no sub-projection claims the point.
    pub fn project(&self, point: impl Into<DVec2>) -> Option<DVec2> {
        let p = point.into();
        let found = self.point.point(p.x, p.y);
        // Every inset sees the point; the first capture wins.
        self.insets.iter().fold(found, |found, inset| {
            let hit = inset.point.as_ref().and_then(|s| s.point(p.x, p.y));
            found.or(hit)
        })
    }

    /// Maps a pixel back to `[lon, lat]` in degrees.
    ///
    /// Pixels inside an inset rectangle invert through that inset, everything else through
    /// the primary projection.
    pub fn invert(&self, point: impl Into<DVec2>) -> DVec2 {
        let p = point.into();
        match self.inset_at(p) {
            Some(inset) => inset.projection.invert(p),
            None => self.lower48.invert(p),
        }
    }

    /// Returns a stream projecting geometry through every sub-projection into `sink`.
    ///
    /// The stream is cached per sink instance: calling again with the same handle returns the
    /// same stream until scale, translate or precision change.
    pub fn stream(&mut self, sink: &SharedStream) -> CompositeStream {
        if let Some(cache) = &self.cache {
            if same_stream(&cache.sink, sink) {
                return Rc::clone(&cache.stream);
            }
        }
        trace!(insets = self.insets.len(), "rebuilding composite stream");
        let mut multiplex = Multiplex::new();
        multiplex.push(self.lower48.stream(Rc::clone(sink)));
        for inset in &self.insets {
            multiplex.push(inset.projection.stream(Rc::clone(sink)));
        }
        let stream = Rc::new(RefCell::new(multiplex));
        self.cache = Some(StreamCache {
            sink: Rc::clone(sink),
            stream: Rc::clone(&stream),
        });
        stream
    }

    /// Streams `geometry` (in degrees) through [`UsMapProjection::stream`] into `sink`.
    pub fn stream_geometry<G: GeoStreamable + ?Sized>(
        &mut self,
        geometry: &G,
        sink: &SharedStream,
    ) {
        let stream = self.stream(sink);
        let mut stream = stream.borrow_mut();
        geometry.stream_to(&mut *stream);
    }

    pub fn precision(&self) -> f64 {
        self.lower48.precision()
    }

    pub fn set_precision(&mut self, precision: f64) -> &mut Self {
        self.lower48.set_precision(precision);
        for inset in &mut self.insets {
            inset.projection.set_precision(precision);
        }
        self.invalidate();
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.set_precision(precision);
        self
    }

    pub fn scale(&self) -> f64 {
        self.lower48.scale()
    }

    /// Rescales every sub-projection, then re-applies the primary projection's current
    /// translate so the scale-relative offsets and clip rectangles follow.
    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        if !scale.is_finite() {
            warn!(scale, "non-finite composite scale");
        }
        self.lower48.set_scale(scale);
        for inset in &mut self.insets {
            inset.projection.set_scale(scale * inset.scale);
        }
        let translate = self.lower48.translate();
        self.set_translate(translate)
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.set_scale(scale);
        self
    }

    /// Logical center of the composite in pixels.
    pub fn translate(&self) -> DVec2 {
        self.lower48.translate() - self.config.offset * self.lower48.scale()
    }

    /// Moves the composite center to `translate`, repositioning and re-clipping every
    /// sub-projection.
    pub fn set_translate(&mut self, translate: impl Into<DVec2>) -> &mut Self {
        let t = translate.into();
        if !t.is_finite() {
            warn!(?t, "non-finite composite translate");
        }
        let k = self.lower48.scale();
        let primary_extent = Extent::centered(t, self.config.half_extent * k);
        self.lower48
            .set_translate(t + self.config.offset * k)
            .set_clip_extent(Some(primary_extent));
        self.point = self.lower48.point_stream();

        for inset in &mut self.insets {
            let extent = inset.extent.scaled(k, t).shrink(self.config.epsilon);
            inset
                .projection
                .set_translate(t + inset.translate * k)
                .set_clip_extent(Some(extent));
            inset.point = Some(inset.projection.point_stream());
        }

        self.invalidate();
        self
    }

    pub fn with_translate(mut self, translate: impl Into<DVec2>) -> Self {
        self.set_translate(translate);
        self
    }

    /// Copies of the active insets, in registry order.
    pub fn insets(&self) -> Vec<Inset> {
        self.insets.clone()
    }

    /// The active inset with the given id, e.g. `"02"` or `"72,78"`.
    pub fn inset(&self, id: &str) -> Option<&Inset> {
        self.insets.iter().find(|inset| inset.id == id)
    }

    /// The active inset whose rectangle contains the pixel `point`, if any.
    pub fn inset_at(&self, point: impl Into<DVec2>) -> Option<&Inset> {
        let k = self.lower48.scale();
        let u = (point.into() - self.lower48.translate()) / k + self.config.offset;
        self.insets
            .iter()
            .find(|inset| inset.extent.contains_half_open(u))
    }

    /// The projection of the contiguous states.
    pub fn primary(&self) -> &Projection {
        &self.lower48
    }

    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }
}

impl Default for UsMapProjection {
    /// All insets.
    fn default() -> Self {
        Self::new(&INSET_FIPS)
    }
}

impl fmt::Debug for UsMapProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsMapProjection")
            .field("scale", &self.scale())
            .field("translate", &self.translate())
            .field("precision", &self.precision())
            .field(
                "insets",
                &self.insets.iter().map(|i| i.id).collect::<Vec<_>>(),
            )
            .field("stream_cached", &self.cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{shared, GeoStream, StreamEvent, VecStream};
    use geo_types::line_string;

    struct City {
        name: &'static str,
        lon_lat: [f64; 2],
        default: [f64; 2],
        scaled_800: [f64; 2],
    }

    const CITIES: [City; 7] = [
        City {
            name: "chicago",
            lon_lat: [-87.6298, 41.8781],
            default: [661.532, 210.249],
            scaled_800: [642.751, 220.454],
        },
        City {
            name: "los angeles",
            lon_lat: [-118.2437, 34.0522],
            default: [194.956, 326.178],
            scaled_800: [303.423, 304.765],
        },
        City {
            name: "honolulu",
            lon_lat: [-157.8583, 21.3069],
            default: [303.389, 511.123],
            scaled_800: [382.283, 439.271],
        },
        City {
            name: "anchorage",
            lon_lat: [-149.9003, 61.2181],
            default: [161.504, 504.766],
            scaled_800: [279.094, 434.648],
        },
        City {
            name: "san juan",
            lon_lat: [-66.1057, 18.4655],
            default: [895.074, 541.966],
            scaled_800: [812.599, 461.703],
        },
        City {
            name: "pago pago",
            lon_lat: [-170.7020, -14.2756],
            default: [32.256, 401.299],
            scaled_800: [185.095, 359.399],
        },
        City {
            name: "hagatna",
            lon_lat: [144.7502, 13.4791],
            default: [31.028, 363.854],
            scaled_800: [184.203, 332.166],
        },
    ];

    fn assert_near(name: &str, actual: Option<DVec2>, expected: [f64; 2], tol: f64) {
        let actual = actual.unwrap_or_else(|| panic!("{name}: projected to None"));
        let expected = DVec2::from(expected);
        assert!(
            (actual - expected).abs().max_element() <= tol,
            "{name}: {actual:?} != {expected:?}"
        );
    }

    #[test]
    fn default_has_all_insets_centered_in_viewbox() {
        let projection = UsMapProjection::default();
        assert_eq!(projection.insets().len(), 5);
        assert_eq!(projection.scale(), 1100.0);
        assert!((projection.translate() - DVec2::new(512.0, 288.0)).length() < 1e-9);
    }

    #[test]
    fn projects_reference_cities() {
        let projection = UsMapProjection::default();
        for city in &CITIES {
            assert_near(city.name, projection.project(city.lon_lat), city.default, 1e-3);
        }
    }

    #[test]
    fn inverts_reference_cities() {
        let projection = UsMapProjection::default();
        for city in &CITIES {
            let lon_lat = projection.invert(city.default);
            assert_near(city.name, Some(lon_lat), city.lon_lat, 1e-3);
        }
    }

    #[test]
    fn insets_absent_project_to_none() {
        let projection = UsMapProjection::lower48();
        assert!(projection.insets().is_empty());
        for city in &CITIES {
            let projected = projection.project(city.lon_lat);
            match city.name {
                "chicago" | "los angeles" => assert_near(city.name, projected, city.default, 1e-3),
                _ => assert_eq!(projected, None, "{}", city.name),
            }
        }
    }

    #[test]
    fn anchorage_needs_the_alaska_inset() {
        let without = UsMapProjection::new(&["15", "72"]);
        assert_eq!(without.project([-149.9003, 61.2181]), None);
        let with = UsMapProjection::new(&["02"]);
        assert_near(
            "anchorage",
            with.project([-149.9003, 61.2181]),
            [161.504, 504.766],
            1e-3,
        );
    }

    #[test]
    fn each_city_is_captured_once() {
        let projection = UsMapProjection::default();
        for city in &CITIES {
            let [lon, lat] = city.lon_lat;
            let captures = usize::from(projection.point.point(lon, lat).is_some())
                + projection
                    .insets
                    .iter()
                    .filter(|i| i.point.as_ref().and_then(|s| s.point(lon, lat)).is_some())
                    .count();
            assert_eq!(captures, 1, "{}", city.name);
        }
    }

    #[test]
    fn translate_shifts_output() {
        let mut projection = UsMapProjection::default();
        projection.set_translate([532.0, 278.0]);
        assert!((projection.translate() - DVec2::new(532.0, 278.0)).length() < 1e-9);
        for city in &CITIES {
            let shifted = [city.default[0] + 20.0, city.default[1] - 10.0];
            assert_near(city.name, projection.project(city.lon_lat), shifted, 1e-3);
        }
    }

    #[test]
    fn scale_matches_reference_output() {
        let projection = UsMapProjection::default().with_scale(800.0);
        assert_eq!(projection.scale(), 800.0);
        for city in &CITIES {
            assert_near(city.name, projection.project(city.lon_lat), city.scaled_800, 1e-3);
        }
    }

    #[test]
    fn round_trips_after_rescale_and_move() {
        let projection = UsMapProjection::default()
            .with_scale(640.0)
            .with_translate([300.0, 200.0]);
        for city in &CITIES {
            let xy = projection
                .project(city.lon_lat)
                .unwrap_or_else(|| panic!("{}: projected to None", city.name));
            assert_near(city.name, Some(projection.invert(xy)), city.lon_lat, 1e-3);
        }
    }

    #[test]
    fn stream_is_memoized_per_sink() {
        let mut projection = UsMapProjection::default();
        let a: SharedStream = shared(VecStream::new());
        let b: SharedStream = shared(VecStream::new());
        let first = projection.stream(&a);
        let again = projection.stream(&a);
        assert!(Rc::ptr_eq(&first, &again));
        let other = projection.stream(&b);
        assert!(!Rc::ptr_eq(&first, &other));
        assert_eq!(other.borrow().len(), 6);
    }

    #[test]
    fn mutation_invalidates_stream_cache() {
        let mut projection = UsMapProjection::default();
        let sink: SharedStream = shared(VecStream::new());

        let before = projection.stream(&sink);
        projection.set_scale(900.0);
        let after_scale = projection.stream(&sink);
        assert!(!Rc::ptr_eq(&before, &after_scale));

        projection.set_translate([400.0, 300.0]);
        let after_translate = projection.stream(&sink);
        assert!(!Rc::ptr_eq(&after_scale, &after_translate));

        projection.set_precision(0.1);
        let after_precision = projection.stream(&sink);
        assert!(!Rc::ptr_eq(&after_translate, &after_precision));
        assert!((projection.precision() - 0.1).abs() < 1e-15);
        assert!(projection
            .insets()
            .iter()
            .all(|i| (i.projection.precision() - 0.1).abs() < 1e-15));
    }

    #[test]
    fn streamed_point_reaches_sink_once() {
        let mut projection = UsMapProjection::default();
        let sink = shared(VecStream::new());
        let handle: SharedStream = sink.clone();
        projection.stream(&handle).borrow_mut().point(-149.9003, 61.2181);
        let points = sink.borrow().points();
        assert_eq!(points.len(), 1);
        assert_near("anchorage", Some(points[0]), [161.504, 504.766], 1e-3);
    }

    #[test]
    fn streamed_line_stays_in_primary_extent() {
        let mut projection = UsMapProjection::default();
        let sink = shared(VecStream::new());
        let handle: SharedStream = sink.clone();
        let line = geo_types::line_string![
            (x: -120.0, y: 45.0),
            (x: -100.0, y: 40.0),
            (x: -80.0, y: 35.0)
        ];
        projection.stream_geometry(&line, &handle);
        let sink = sink.borrow();
        assert_eq!(sink.count(StreamEvent::LineStart), 1);
        assert_eq!(sink.count(StreamEvent::LineEnd), 1);
        let extent = projection.primary().clip_extent().expect("primary is clipped");
        assert!(sink.points().iter().all(|p| extent.contains(*p)));
    }

    #[test]
    fn composites_do_not_share_sub_projections() {
        let mut a = UsMapProjection::default();
        let b = UsMapProjection::new(&["02", "15"]);
        a.set_scale(500.0).set_translate([100.0, 100.0]);
        let alaska = b.inset("02").expect("alaska is active");
        assert!((alaska.projection.scale() - 1100.0 * 0.35).abs() < 1e-9);
        assert_near("honolulu", b.project([-157.8583, 21.3069]), [303.389, 511.123], 1e-3);
    }

    #[test]
    fn insets_snapshot_is_detached() {
        let projection = UsMapProjection::default();
        let mut snapshot = projection.insets();
        snapshot[0].projection.set_scale(1.0);
        assert!((projection.insets()[0].projection.scale() - 385.0).abs() < 1e-9);
    }

    #[test]
    fn inset_lookup_by_id_and_pixel() {
        let projection = UsMapProjection::default();
        assert_eq!(projection.inset("72,78").map(|i| i.codes), Some(&["PR", "VI"][..]));
        assert!(projection.inset("06").is_none());
        assert_eq!(projection.inset_at([161.504, 504.766]).map(|i| i.id), Some("02"));
        assert_eq!(projection.inset_at([895.074, 541.966]).map(|i| i.id), Some("72,78"));
        assert!(projection.inset_at([661.532, 210.249]).is_none());
    }

    #[test]
    fn scope_constructors() {
        assert_eq!(UsMapProjection::from_scope(Scope::All).insets().len(), 5);
        assert_eq!(UsMapProjection::from_scope(Scope::States).insets().len(), 2);
        assert!(UsMapProjection::from_scope(Scope::Lower48).insets().is_empty());
        assert!(UsMapProjection::new(&["01", "06", "36"]).insets().is_empty());
    }

    #[test]
    fn try_with_config_validates() {
        let bad = CompositeConfig::default().with_scale(-1.0);
        assert!(UsMapProjection::try_with_config(&INSET_FIPS, bad).is_err());

        let config = CompositeConfig::default().with_viewbox([960.0, 600.0]);
        let projection =
            UsMapProjection::try_with_config(&INSET_FIPS, config).expect("valid config");
        assert!((projection.translate() - DVec2::new(480.0, 300.0)).length() < 1e-9);
        assert_eq!(projection.config().viewbox, DVec2::new(960.0, 600.0));
    }

    #[test]
    fn debug_lists_inset_ids() {
        let dbg = format!("{:?}", UsMapProjection::new(&["02"]));
        assert!(dbg.contains("UsMapProjection"));
        assert!(dbg.contains("\"02\""));
    }
}

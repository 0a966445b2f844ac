#![forbid(unsafe_code)]
//! us_map_projection: Albers projection of the United States with repositioned insets.
//!
//! Modules:
//! - composite: the composite projection, its inset registry and scope presets
//! - projection: single projections (conic equal-area, equirectangular), rotation, clipping
//! - stream: push-based geometry streams, fan-out, and `geo-types` adapters
//! - extent: pixel and scale-relative rectangles
//!
//! For examples and docs, see README and docs.rs.
pub mod composite;
pub mod error;
pub mod extent;
mod math;
pub mod projection;
pub mod stream;

/// Convenient re-exports for common types. Import with `use us_map_projection::prelude::*;`.
pub mod prelude {
    pub use crate::composite::scopes;
    pub use crate::composite::{
        inset_data, inset_states, make_insets, CompositeConfig, CompositeStream, Inset,
        InsetKind, Scope, UsMapProjection, INSET_FIPS,
    };
    pub use crate::error::{Error, Result};
    pub use crate::extent::Extent;
    pub use crate::projection::{PointStream, Projection, RawProjection, Rotation};
    pub use crate::stream::{
        same_stream, shared, stream_geometry, stream_sphere, GeoStream, GeoStreamable, Multiplex,
        SharedStream, StreamEvent, VecStream,
    };
}

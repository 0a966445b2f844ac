#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{graticule, init_tracing, Canvas, RenderConfig};

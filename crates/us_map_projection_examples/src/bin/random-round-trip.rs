use glam::DVec2;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::info;
use us_map_projection::prelude::*;
use us_map_projection_examples::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let count = 100_000usize;
    let mut rng = StdRng::seed_from_u64(2025);
    let projection = UsMapProjection::default()
        .with_scale(1600.0)
        .with_translate([800.0, 450.0]);

    let mut shown = 0usize;
    let mut max_error = 0.0f64;
    for _ in 0..count {
        let p = DVec2::new(
            rng.random_range(-180.0..180.0),
            rng.random_range(-60.0..75.0),
        );
        if let Some(xy) = projection.project(p) {
            shown += 1;
            max_error = max_error.max((projection.invert(xy) - p).length());
        }
    }

    info!(count, shown, max_error, "round trip finished");
    println!("{shown} of {count} random points shown, max inverse error {max_error:.3e} degrees");
    Ok(())
}

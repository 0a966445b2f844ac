use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Seeded `[lon, lat]` samples spread over the contiguous states and the Pacific insets.
#[allow(dead_code)]
pub fn lon_lats(count: usize, seed: u64) -> Vec<DVec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            DVec2::new(
                rng.random_range(-180.0..-60.0),
                rng.random_range(-20.0..70.0),
            )
        })
        .collect()
}

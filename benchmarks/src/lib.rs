//! Synthetic maps for the SkyRoute benchmarks
//!
//! Run with: cargo bench -p skyroute_benchmarks

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyroute_library::algorithms::occupancy_grid::ObstacleRecord;

/// Square city of `blocks x blocks` buildings with randomized heights
///
/// Buildings are `2 * half_size` wide and sit on a `pitch` meter raster, so
/// streets are `pitch - 2 * half_size` wide. Roughly a third of the buildings
/// stay below 5 m and drop out of the grid at the default flight altitude.
pub fn synthetic_city(blocks: usize, pitch: f64, half_size: f64, seed: u64) -> Vec<ObstacleRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut obstacles = Vec::with_capacity(blocks * blocks);

    for i in 0..blocks {
        for j in 0..blocks {
            let height = if rng.gen_bool(0.3) {
                rng.gen_range(0.5..2.0)
            } else {
                rng.gen_range(10.0..80.0)
            };
            obstacles.push(ObstacleRecord::new(
                pitch * (i as f64 + 0.5),
                pitch * (j as f64 + 0.5),
                height / 2.0,
                half_size,
                half_size,
                height / 2.0,
            ));
        }
    }

    obstacles
}

/// Street intersection nearest the south-west and north-east corners
pub fn corner_positions(blocks: usize, pitch: f64) -> ((f64, f64), (f64, f64)) {
    let far = pitch * blocks as f64 - pitch;
    ((pitch, pitch), (far, far))
}

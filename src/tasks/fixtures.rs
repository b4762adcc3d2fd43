//! Deterministic demo fixtures standing in for the fixed two-phase test
//! patterns spec.md's end-to-end scenarios load from disk (spec.md §8,
//! S1–S3). Not part of the annealing core; used only by `examples`.

use ndarray::{Array2, ArrayD, IxDyn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::grid::{Boundary, Grid};

/// A coherent two-phase pattern: sample a coarse grid of random values,
/// bilinearly interpolate up to `shape`, and threshold at the median so
/// both phases cover (approximately) half the lattice.
pub fn value_noise_pattern(shape: (usize, usize), cell: usize, seed: u64) -> Grid {
    let (h, w) = shape;
    let mut rng = SmallRng::seed_from_u64(seed);

    let coarse_h = h / cell + 2;
    let coarse_w = w / cell + 2;
    let coarse = Array2::from_shape_fn((coarse_h, coarse_w), |_| rng.random::<f64>());

    let mut field = Array2::<f64>::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            let gy = y as f64 / cell as f64;
            let gx = x as f64 / cell as f64;
            let y0 = gy.floor() as usize;
            let x0 = gx.floor() as usize;
            let fy = gy - y0 as f64;
            let fx = gx - x0 as f64;

            let v00 = coarse[[y0, x0]];
            let v01 = coarse[[y0, x0 + 1]];
            let v10 = coarse[[y0 + 1, x0]];
            let v11 = coarse[[y0 + 1, x0 + 1]];

            let top = v00 * (1.0 - fx) + v01 * fx;
            let bottom = v10 * (1.0 - fx) + v11 * fx;
            field[[y, x]] = top * (1.0 - fy) + bottom * fy;
        }
    }

    let mut sorted: Vec<f64> = field.iter().copied().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = sorted[sorted.len() / 2];

    let data = ArrayD::from_shape_fn(IxDyn(&[h, w]), |idx| if field[[idx[0], idx[1]]] >= median { 1u8 } else { 0u8 });
    Grid::from_array(data, Boundary::Periodic)
}

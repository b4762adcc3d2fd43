//! Initializers (spec.md §4.6): produce a starting system tracker shaped
//! like (but independent of) a target tracker.

use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use rayon::prelude::*;

use crate::grid::{Boundary, Grid};
use crate::tracker::{GridTracker, Tracker};
use crate::util::all_indices;

/// Fraction of `1`-valued sites among `target`'s tracked sites, then fill a
/// fresh grid of `shape` (defaulting to the target's own shape) with that
/// many `1`s at uniformly random, duplicate-retried positions (spec.md
/// §4.6).
pub fn initialize_random<R: Rng + ?Sized>(target: &GridTracker, shape: Option<&[usize]>, rng: &mut R) -> GridTracker {
    let shape = shape.unwrap_or_else(|| target.shape()).to_vec();
    let phi = target.grid().count_ones() as f64 / target.grid().len() as f64;
    let total: usize = shape.iter().product();
    let target_ones = (phi * total as f64).floor() as usize;

    let mut data = ArrayD::zeros(IxDyn(&shape));
    let mut set = 0usize;
    while set < target_ones {
        let idx: Vec<usize> = shape.iter().map(|&extent| rng.random_range(0..extent)).collect();
        let slot = &mut data[IxDyn(&idx)];
        if *slot == 0 {
            *slot = 1;
            set += 1;
        }
        // duplicate draws are silently retried by falling through the loop
    }

    let grid = Grid::from_array(data, target.grid().boundary());
    target.construct_like(grid)
}

/// Boolean sphere model: fit `(R, lambda)` against `target`'s measured
/// void fraction and correlation length, draw `Poisson(lambda * |shape|)`
/// sphere centers uniformly, and fill every site covered by a sphere
/// (spec.md §4.6). Phase fraction is not guaranteed exact.
pub fn initialize_spheres<R: Rng + ?Sized>(
    target: &GridTracker,
    shape: Option<&[usize]>,
    r0: f64,
    lambda0: f64,
    rng: &mut R,
) -> GridTracker {
    let shape = shape.unwrap_or_else(|| target.shape()).to_vec();
    let boundary = target.grid().boundary();
    let (radius, lambda) = fit_sphere_params(target, r0, lambda0);

    let total: usize = shape.iter().product();
    let intensity = (lambda * total as f64).max(0.0);
    let num_centers = if intensity > 0.0 {
        Poisson::new(intensity).map(|dist| dist.sample(rng) as usize).unwrap_or(0)
    } else {
        0
    };

    let centers: Vec<Vec<usize>> = (0..num_centers)
        .map(|_| shape.iter().map(|&extent| rng.random_range(0..extent)).collect())
        .collect();

    let periodic = matches!(boundary, Boundary::Periodic);
    let data: Vec<u8> = all_indices(&shape)
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|idx| {
            let covered = centers.iter().any(|c| lattice_distance(&idx, c, &shape, periodic) <= radius);
            covered as u8
        })
        .collect();

    let arr = ArrayD::from_shape_vec(IxDyn(&shape), data).expect("shape matches site count");
    let grid = Grid::from_array(arr, boundary);
    target.construct_like(grid)
}

fn lattice_distance(a: &[usize], b: &[usize], shape: &[usize], periodic: bool) -> f64 {
    let sq: f64 = a
        .iter()
        .zip(b)
        .zip(shape)
        .map(|((&ai, &bi), &extent)| {
            let mut d = (ai as i64 - bi as i64).abs();
            if periodic {
                d = d.min(extent as i64 - d);
            }
            (d * d) as f64
        })
        .sum();
    sq.sqrt()
}

fn sphere_volume(dim: usize, r: f64) -> f64 {
    match dim {
        2 => std::f64::consts::PI * r * r,
        _ => (4.0 / 3.0) * std::f64::consts::PI * r.powi(3),
    }
}

/// Fraction of phase-0 ("void") sites in `grid`.
fn void_fraction(grid: &Grid) -> f64 {
    1.0 - (grid.count_ones() as f64 / grid.len() as f64)
}

/// Brute-force S2(r) of phase 0 along axis 0, used only at fit time (never
/// on the annealing hot path).
fn void_s2_along_axis0(grid: &Grid, r: usize) -> f64 {
    let shape = grid.shape();
    let mut dir = vec![0i64; shape.len()];
    dir[0] = 1;

    let mut matches = 0usize;
    let mut total = 0usize;
    for idx in all_indices(shape) {
        let signed: Vec<i64> = idx.iter().map(|&v| v as i64).collect();
        let offset: Vec<i64> = signed.iter().zip(&dir).map(|(&a, &d)| a + d * r as i64).collect();
        if let Some(other) = grid.wrap_point(&offset) {
            total += 1;
            if grid.read(&idx) == 0 && grid.read(&other) == 0 {
                matches += 1;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    }
}

/// Smallest `r` at which the void-phase correlation has decayed to within
/// `1/e` of its asymptote, used as a one-point estimate of the target's
/// correlation length (spec.md §4.6, (ADDED) SPEC_FULL.md §4.9).
fn probe_correlation_length(grid: &Grid, p_void: f64) -> f64 {
    let max_r = grid.shape().iter().copied().max().unwrap_or(1) / 2;
    if max_r == 0 {
        return 1.0;
    }
    let s2_0 = p_void;
    let asymptote = p_void * p_void;
    let threshold = asymptote + (s2_0 - asymptote) / std::f64::consts::E;

    for r in 1..=max_r {
        if void_s2_along_axis0(grid, r) <= threshold {
            return r as f64;
        }
    }
    max_r as f64
}

/// Choose `(R, lambda)` for a Boolean sphere model so its analytic
/// void-phase `S2(0) = 1 - phi` and a one-point decay estimate match
/// `target`'s measured void fraction and correlation length. `R` follows
/// directly from the decay estimate; `lambda` is bisected against the
/// closed-form void relation `exp(-lambda * V(R)) = p_void`
/// ((ADDED) SPEC_FULL.md §4.9 — documented simplification in DESIGN.md).
pub fn fit_sphere_params(target: &GridTracker, r0: f64, lambda0: f64) -> (f64, f64) {
    let grid = target.grid();
    let dim = grid.ndim();
    let p_void = void_fraction(grid).clamp(1e-6, 1.0 - 1e-6);

    let decay_len = probe_correlation_length(grid, p_void);
    let radius = if decay_len > 0.0 { (decay_len / 2.0).max(0.5) } else { r0.max(0.5) };

    let volume = sphere_volume(dim, radius);
    let target_fn = |lambda: f64| (-lambda * volume).exp() - p_void;

    let mut lo = 0.0f64;
    let mut hi = (lambda0.max(1e-6)) * 1000.0;
    // exp(-lo*v) - p_void = 1 - p_void > 0; ensure hi crosses to negative.
    while target_fn(hi) > 0.0 {
        hi *= 2.0;
    }
    for _ in 0..60 {
        let mid = 0.5 * (lo + hi);
        if target_fn(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    (radius, 0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::tracker::{DescriptorId, DescriptorSpec};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn target_tracker(n: usize, phase1_fraction_numerator: usize) -> GridTracker {
        let mut data = ArrayD::zeros(IxDyn(&[n, n]));
        let total = n * n;
        let ones = total * phase1_fraction_numerator / 10;
        for (count, idx) in all_indices(&[n, n]).enumerate() {
            if count < ones {
                data[IxDyn(&idx)] = 1;
            }
        }
        let grid = Grid::from_array(data, Boundary::Periodic);
        GridTracker::new(grid, Direction::standard_2d(), vec![DescriptorSpec { id: DescriptorId::s2(1), length: 2 }])
    }

    #[test]
    fn initialize_random_hits_target_phase_fraction() {
        let target = target_tracker(10, 3);
        let mut rng = SmallRng::seed_from_u64(1);
        let system = initialize_random(&target, None, &mut rng);

        let phi_target = target.grid().count_ones() as f64 / target.grid().len() as f64;
        let phi_system = system.grid().count_ones() as f64 / system.grid().len() as f64;
        assert!((phi_target - phi_system).abs() < 1e-9);
    }

    #[test]
    fn initialize_random_inherits_tracked_descriptors() {
        let target = target_tracker(8, 4);
        let mut rng = SmallRng::seed_from_u64(2);
        let system = initialize_random(&target, None, &mut rng);
        assert_eq!(system.tracked_descriptors(), target.tracked_descriptors());
        assert_eq!(system.shape(), target.shape());
    }

    #[test]
    fn fit_sphere_params_yields_positive_radius_and_intensity() {
        let target = target_tracker(16, 4);
        let (radius, lambda) = fit_sphere_params(&target, 2.0, 0.01);
        assert!(radius > 0.0);
        assert!(lambda > 0.0);
    }

    #[test]
    fn initialize_spheres_produces_requested_shape() {
        let target = target_tracker(12, 3);
        let mut rng = SmallRng::seed_from_u64(5);
        let system = initialize_spheres(&target, Some(&[20, 20]), 2.0, 0.02, &mut rng);
        assert_eq!(system.shape(), &[20, 20]);
    }
}

//! Concrete `Tracker` implementation backed by a dense `Grid`, maintaining
//! S₂ (two-point) and L₂ (lineal-path) descriptors incrementally.
//!
//! Complexity note: `S2` updates touch `O(length)` sites per direction, as
//! spec.md §4.8 requires. `L2` updates touch `O(length²)` sites per
//! direction (every candidate run that could contain the written site,
//! each checked end-to-end) — still independent of grid size `N`, but not
//! the idealized `O(length)` bound. See `DESIGN.md` for the tradeoff.

use super::descriptor::{CorrelationData, CorrelationKind, DescriptorId, DescriptorSpec};
use super::{DescriptorDelta, RollbackToken, SingleRollback, Tracker};
use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::grid::Grid;
use crate::util::all_indices;

#[derive(Debug, Clone)]
pub struct GridTracker {
    grid: Grid,
    directions: Vec<Direction>,
    dir_steps: Vec<Vec<i64>>,
    descriptors: Vec<DescriptorSpec>,
    descriptor_ids: Vec<DescriptorId>,
    numerators: Vec<Vec<Vec<f64>>>,
    correlations: Vec<CorrelationData>,
    denom_s2: Vec<Vec<f64>>,
    denom_l2: Vec<Vec<f64>>,
}

impl GridTracker {
    /// Build a tracker over `grid`, computing every descriptor's initial
    /// correlation vectors from scratch (an O(N · length) to
    /// O(N · length²) pass, acceptable at construction time only).
    pub fn new(grid: Grid, directions: Vec<Direction>, descriptors: Vec<DescriptorSpec>) -> Self {
        let dir_steps: Vec<Vec<i64>> = directions.iter().map(|d| d.step.clone()).collect();
        let descriptor_ids: Vec<DescriptorId> = descriptors.iter().map(|d| d.id).collect();

        let max_s2 = descriptors
            .iter()
            .filter(|d| d.id.kind == CorrelationKind::S2)
            .map(|d| d.length)
            .max();
        let max_l2 = descriptors
            .iter()
            .filter(|d| d.id.kind == CorrelationKind::L2)
            .map(|d| d.length)
            .max();

        let denom_s2: Vec<Vec<f64>> = match max_s2 {
            Some(len) => dir_steps.iter().map(|d| compute_pair_denom(&grid, d, len)).collect(),
            None => dir_steps.iter().map(|_| Vec::new()).collect(),
        };
        let denom_l2: Vec<Vec<f64>> = match max_l2 {
            Some(len) => dir_steps.iter().map(|d| compute_run_denom(&grid, d, len)).collect(),
            None => dir_steps.iter().map(|_| Vec::new()).collect(),
        };

        let mut numerators = Vec::with_capacity(descriptors.len());
        let mut correlations = Vec::with_capacity(descriptors.len());
        for spec in &descriptors {
            let mut per_dir_num = Vec::with_capacity(dir_steps.len());
            let mut per_dir_corr = Vec::with_capacity(dir_steps.len());
            for (dj, d) in dir_steps.iter().enumerate() {
                let num = full_numerator(&grid, d, spec.length, spec.id.phase, spec.id.kind);
                let denom = match spec.id.kind {
                    CorrelationKind::S2 => &denom_s2[dj][..=spec.length],
                    CorrelationKind::L2 => &denom_l2[dj][..=spec.length],
                };
                let corr: Vec<f64> = num
                    .iter()
                    .zip(denom)
                    .map(|(&n, &d)| if d > 0.0 { n / d } else { 0.0 })
                    .collect();
                per_dir_num.push(num);
                per_dir_corr.push(corr);
            }
            numerators.push(per_dir_num);
            correlations.push(CorrelationData::new(per_dir_corr));
        }

        Self {
            grid,
            directions,
            dir_steps,
            descriptors,
            descriptor_ids,
            numerators,
            correlations,
            denom_s2,
            denom_l2,
        }
    }

    /// Build a fresh tracker over a new grid, inheriting this tracker's
    /// descriptor set, direction set, and correlation lengths (spec.md §6
    /// `construct_like`). The caller is responsible for giving `grid` the
    /// same periodicity as `self`.
    pub fn construct_like(&self, grid: Grid) -> Self {
        Self::new(grid, self.directions.clone(), self.descriptors.clone())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn descriptor_index(&self, id: DescriptorId) -> usize {
        self.descriptor_ids
            .iter()
            .position(|&d| d == id)
            .unwrap_or_else(|| panic!("descriptor {id:?} is not tracked by this GridTracker"))
    }

    fn denom(&self, kind: CorrelationKind, dj: usize, r: usize) -> f64 {
        match kind {
            CorrelationKind::S2 => self.denom_s2[dj][r],
            CorrelationKind::L2 => self.denom_l2[dj][r],
        }
    }

    fn apply_single(&mut self, value: u8, idx: &[usize]) -> CoreResult<SingleRollback> {
        if idx.len() != self.grid.ndim() || idx.iter().zip(self.grid.shape()).any(|(&i, &s)| i >= s) {
            return Err(CoreError::OutOfBounds(idx.to_vec(), self.grid.shape().to_vec()));
        }

        let prior_value = self.grid.read(idx);

        let mut befores = Vec::with_capacity(self.descriptors.len() * self.dir_steps.len());
        for (di, spec) in self.descriptors.iter().enumerate() {
            for (dj, dir) in self.dir_steps.iter().enumerate() {
                let before = window(&self.grid, idx, dir, spec.length, spec.id.phase, spec.id.kind);
                befores.push((di, dj, before));
            }
        }

        self.grid.write(idx, value);

        let mut deltas = Vec::with_capacity(befores.len());
        for (di, dj, before) in befores {
            let spec = &self.descriptors[di];
            let after = window(&self.grid, idx, &self.dir_steps[dj], spec.length, spec.id.phase, spec.id.kind);
            let mut per_r = vec![0.0; before.len()];
            for r in 0..before.len() {
                let d = after[r] - before[r];
                per_r[r] = d;
                self.numerators[di][dj][r] += d;
                let denom = self.denom(spec.id.kind, dj, r);
                self.correlations[di].per_direction[dj][r] = if denom > 0.0 {
                    self.numerators[di][dj][r] / denom
                } else {
                    0.0
                };
            }
            deltas.push(DescriptorDelta { descriptor_idx: di, direction_idx: dj, per_r });
        }

        Ok(SingleRollback { idx: idx.to_vec(), prior_value, deltas })
    }

    fn undo_single(&mut self, sr: &SingleRollback) {
        self.grid.write(&sr.idx, sr.prior_value);
        for d in &sr.deltas {
            let spec = &self.descriptors[d.descriptor_idx];
            for (r, &dv) in d.per_r.iter().enumerate() {
                self.numerators[d.descriptor_idx][d.direction_idx][r] -= dv;
                let denom = self.denom(spec.id.kind, d.direction_idx, r);
                self.correlations[d.descriptor_idx].per_direction[d.direction_idx][r] = if denom > 0.0 {
                    self.numerators[d.descriptor_idx][d.direction_idx][r] / denom
                } else {
                    0.0
                };
            }
        }
    }
}

impl Tracker for GridTracker {
    fn shape(&self) -> &[usize] {
        self.grid.shape()
    }

    fn is_periodic(&self) -> bool {
        self.grid.is_periodic()
    }

    fn read(&self, idx: &[usize]) -> u8 {
        self.grid.read(idx)
    }

    fn locate(&self, point: &[i64]) -> Option<Vec<usize>> {
        self.grid.wrap_point(point)
    }

    fn update(&mut self, value: u8, idx: &[usize]) -> CoreResult<RollbackToken> {
        self.apply_single(value, idx).map(RollbackToken::Single)
    }

    fn rollback(&mut self, token: RollbackToken) {
        match token {
            RollbackToken::Single(sr) => self.undo_single(&sr),
            // Swapper applies token1 then token2; rewinding must replay in
            // reverse so the tracker's intermediate states mirror the
            // forward path (spec.md §4.3).
            RollbackToken::Pair(a, b) => {
                self.undo_single(&b);
                self.undo_single(&a);
            }
        }
    }

    fn tracked_descriptors(&self) -> &[DescriptorId] {
        &self.descriptor_ids
    }

    fn correlation_for(&self, descriptor: DescriptorId) -> &CorrelationData {
        &self.correlations[self.descriptor_index(descriptor)]
    }

    fn directions(&self, _descriptor: DescriptorId) -> &[Direction] {
        &self.directions
    }
}

// ---------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------

fn step_point(start: &[i64], dir: &[i64], k: i64) -> Vec<i64> {
    start.iter().zip(dir).map(|(&s, &d)| s + k * d).collect()
}

fn run_in_bounds(grid: &Grid, start: &[i64], dir: &[i64], r: usize) -> bool {
    (0..=r).all(|k| grid.wrap_point(&step_point(start, dir, k as i64)).is_some())
}

/// `None` if the run (all `r + 1` sites) is not fully in-bounds; otherwise
/// whether every site in the run equals `phase`.
fn run_all_phase(grid: &Grid, start: &[i64], dir: &[i64], r: usize, phase: u8) -> Option<bool> {
    if !run_in_bounds(grid, start, dir, r) {
        return None;
    }
    for k in 0..=r {
        let p = step_point(start, dir, k as i64);
        let t = grid.wrap_point(&p).expect("checked in-bounds above");
        if grid.read(&t) != phase {
            return Some(false);
        }
    }
    Some(true)
}

fn window(grid: &Grid, idx: &[usize], dir: &[i64], length: usize, phase: u8, kind: CorrelationKind) -> Vec<f64> {
    match kind {
        CorrelationKind::S2 => window_s2(grid, idx, dir, length, phase),
        CorrelationKind::L2 => window_l2(grid, idx, dir, length, phase),
    }
}

/// S₂ contribution touching `idx`: one term at `r = 0` (`idx` itself), and
/// two terms per `r >= 1` (`idx` as the pair's start, and `idx` as the
/// pair's end) — spec.md §4.8.
fn window_s2(grid: &Grid, idx: &[usize], dir: &[i64], length: usize, phase: u8) -> Vec<f64> {
    let mut out = vec![0.0; length + 1];
    let self_val = grid.read(idx);
    out[0] = f64::from(self_val == phase);
    let idx_i64: Vec<i64> = idx.iter().map(|&v| v as i64).collect();
    for r in 1..=length {
        let mut count = 0.0;
        for sign in [1i64, -1i64] {
            let p = step_point(&idx_i64, dir, sign * r as i64);
            if let Some(t) = grid.wrap_point(&p) {
                if self_val == phase && grid.read(&t) == phase {
                    count += 1.0;
                }
            }
        }
        out[r] = count;
    }
    out
}

/// L₂ contribution touching `idx`: every run of length `r + 1` whose span
/// covers `idx` (`idx` may sit at any of its `r + 1` positions).
fn window_l2(grid: &Grid, idx: &[usize], dir: &[i64], length: usize, phase: u8) -> Vec<f64> {
    let mut out = vec![0.0; length + 1];
    let idx_i64: Vec<i64> = idx.iter().map(|&v| v as i64).collect();
    out[0] = f64::from(grid.read(idx) == phase);
    for r in 1..=length {
        let mut count = 0.0;
        for k in 0..=r as i64 {
            let start = step_point(&idx_i64, dir, -k);
            if let Some(true) = run_all_phase(grid, &start, dir, r, phase) {
                count += 1.0;
            }
        }
        out[r] = count;
    }
    out
}

fn full_numerator(grid: &Grid, dir: &[i64], length: usize, phase: u8, kind: CorrelationKind) -> Vec<f64> {
    match kind {
        CorrelationKind::S2 => full_s2(grid, dir, length, phase),
        CorrelationKind::L2 => full_l2(grid, dir, length, phase),
    }
}

fn full_s2(grid: &Grid, dir: &[i64], length: usize, phase: u8) -> Vec<f64> {
    let mut out = vec![0.0; length + 1];
    for x in all_indices(grid.shape()) {
        if grid.read(&x) == phase {
            out[0] += 1.0;
        }
    }
    for r in 1..=length {
        let mut count = 0.0;
        for x in all_indices(grid.shape()) {
            if grid.read(&x) != phase {
                continue;
            }
            let xi: Vec<i64> = x.iter().map(|&v| v as i64).collect();
            let p = step_point(&xi, dir, r as i64);
            if let Some(t) = grid.wrap_point(&p) {
                if grid.read(&t) == phase {
                    count += 1.0;
                }
            }
        }
        out[r] = count;
    }
    out
}

fn full_l2(grid: &Grid, dir: &[i64], length: usize, phase: u8) -> Vec<f64> {
    let mut out = vec![0.0; length + 1];
    for r in 0..=length {
        let mut count = 0.0;
        for x in all_indices(grid.shape()) {
            let start: Vec<i64> = x.iter().map(|&v| v as i64).collect();
            if let Some(true) = run_all_phase(grid, &start, dir, r, phase) {
                count += 1.0;
            }
        }
        out[r] = count;
    }
    out
}

fn compute_pair_denom(grid: &Grid, dir: &[i64], length: usize) -> Vec<f64> {
    (0..=length)
        .map(|r| {
            if grid.is_periodic() {
                grid.len() as f64
            } else {
                all_indices(grid.shape())
                    .filter(|x| {
                        let xi: Vec<i64> = x.iter().map(|&v| v as i64).collect();
                        grid.wrap_point(&step_point(&xi, dir, r as i64)).is_some()
                    })
                    .count() as f64
            }
        })
        .collect()
}

fn compute_run_denom(grid: &Grid, dir: &[i64], length: usize) -> Vec<f64> {
    (0..=length)
        .map(|r| {
            if grid.is_periodic() {
                grid.len() as f64
            } else {
                all_indices(grid.shape())
                    .filter(|x| {
                        let xi: Vec<i64> = x.iter().map(|&v| v as i64).collect();
                        run_in_bounds(grid, &xi, dir, r)
                    })
                    .count() as f64
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Boundary;
    use ndarray::ArrayD;

    fn small_periodic_tracker() -> GridTracker {
        let data = ArrayD::from_shape_vec(
            ndarray::IxDyn(&[4, 4]),
            vec![
                1, 0, 1, 0, //
                0, 1, 0, 1, //
                1, 1, 0, 0, //
                0, 0, 1, 1, //
            ],
        )
        .unwrap();
        let grid = Grid::from_array(data, Boundary::Periodic);
        let directions = Direction::standard_2d();
        let descriptors = vec![
            DescriptorSpec { id: DescriptorId::s2(1), length: 2 },
            DescriptorSpec { id: DescriptorId::l2(1), length: 2 },
        ];
        GridTracker::new(grid, directions, descriptors)
    }

    #[test]
    fn update_then_rollback_is_exact() {
        let mut tracker = small_periodic_tracker();
        let before_grid = tracker.grid().clone().raw().clone();
        let before_corr: Vec<_> = tracker.correlations.clone();

        let token = tracker.update(1 - tracker.read(&[1, 2]), &[1, 2]).unwrap();
        tracker.rollback(token);

        assert_eq!(tracker.grid().raw(), &before_grid);
        for (a, b) in tracker.correlations.iter().zip(&before_corr) {
            assert_eq!(a.per_direction, b.per_direction);
        }
    }

    #[test]
    fn s2_matches_brute_force_after_update() {
        let mut tracker = small_periodic_tracker();
        let new_val = 1 - tracker.read(&[0, 0]);
        tracker.update(new_val, &[0, 0]).unwrap();

        let recomputed = full_s2(tracker.grid(), &tracker.dir_steps[0], 2, 1);
        let denom = &tracker.denom_s2[0];
        let expected: Vec<f64> = recomputed.iter().zip(denom).map(|(&n, &d)| n / d).collect();
        let actual = tracker.correlation_for(DescriptorId::s2(1)).for_direction(0);
        for (e, a) in expected.iter().zip(actual) {
            assert!((e - a).abs() < 1e-9, "expected {e}, got {a}");
        }
    }
}

//! DPN (different-phase-neighbors) sampler (spec.md §4.2).
//!
//! Carries a histogram `H[0..3^N - 1]` where `H[n]` is the number of grid
//! sites with exactly `n` Moore-neighborhood neighbors of the opposite
//! phase. Sampling draws `n` with probability proportional to `α^n · H[n]`,
//! then rejection-samples a uniformly random index with that DPN count.

use rand::Rng;

use crate::error::{CoreError, CoreResult};
use crate::tracker::Tracker;
use crate::util::{all_indices, moore_offsets};

#[derive(Debug, Clone)]
pub struct Dpn {
    alpha: f64,
    max_n: usize,
    histogram: Vec<usize>,
}

fn dpn_count<T: Tracker + ?Sized>(tracker: &T, idx: &[usize]) -> usize {
    let own = tracker.read(idx);
    let idx_i64: Vec<i64> = idx.iter().map(|&v| v as i64).collect();
    moore_offsets(idx.len())
        .into_iter()
        .filter_map(|off| {
            let p: Vec<i64> = idx_i64.iter().zip(&off).map(|(&a, &b)| a + b).collect();
            tracker.locate(&p)
        })
        .filter(|nb| tracker.read(nb) != own)
        .count()
}

impl Dpn {
    pub fn new<T: Tracker>(tracker: &T, alpha: f64) -> Self {
        let dim = tracker.shape().len();
        let max_n = 3usize.pow(dim as u32) - 1;
        let mut histogram = vec![0usize; max_n + 1];
        for idx in all_indices(tracker.shape()) {
            histogram[dpn_count(tracker, &idx)] += 1;
        }
        Self { alpha, max_n, histogram }
    }

    /// Recompute the histogram from scratch; used by tests to verify
    /// incremental maintenance (spec.md §8 property 7).
    pub fn recompute<T: Tracker>(tracker: &T) -> Vec<usize> {
        let dim = tracker.shape().len();
        let max_n = 3usize.pow(dim as u32) - 1;
        let mut histogram = vec![0usize; max_n + 1];
        for idx in all_indices(tracker.shape()) {
            histogram[dpn_count(tracker, &idx)] += 1;
        }
        histogram
    }

    pub fn histogram(&self) -> &[usize] {
        &self.histogram
    }

    pub fn sample<T: Tracker, R: Rng + ?Sized>(&self, tracker: &T, rng: &mut R) -> CoreResult<Vec<usize>> {
        let weights: Vec<f64> = (0..=self.max_n)
            .map(|n| self.alpha.powi(n as i32) * self.histogram[n] as f64)
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(CoreError::DpnInvariant(0));
        }

        let mut draw = rng.random::<f64>() * total;
        let mut chosen = self.max_n;
        for (n, &w) in weights.iter().enumerate() {
            if draw < w {
                chosen = n;
                break;
            }
            draw -= w;
        }

        if self.histogram[chosen] == 0 {
            return Err(CoreError::DpnInvariant(chosen));
        }

        loop {
            let idx: Vec<usize> = tracker.shape().iter().map(|&s| rng.random_range(0..s)).collect();
            if dpn_count(tracker, &idx) == chosen {
                return Ok(idx);
            }
        }
    }

    pub fn update_pre<T: Tracker>(&mut self, tracker: &T, idx: &[usize]) {
        for site in self.affected_sites(tracker, idx) {
            let n = dpn_count(tracker, &site);
            self.histogram[n] -= 1;
        }
    }

    pub fn update_post<T: Tracker>(&mut self, tracker: &T, idx: &[usize]) {
        for site in self.affected_sites(tracker, idx) {
            let n = dpn_count(tracker, &site);
            self.histogram[n] += 1;
        }
    }

    fn affected_sites<T: Tracker>(&self, tracker: &T, idx: &[usize]) -> Vec<Vec<usize>> {
        let idx_i64: Vec<i64> = idx.iter().map(|&v| v as i64).collect();
        let mut sites = vec![idx.to_vec()];
        for off in moore_offsets(idx.len()) {
            let p: Vec<i64> = idx_i64.iter().zip(&off).map(|(&a, &b)| a + b).collect();
            if let Some(nb) = tracker.locate(&p) {
                sites.push(nb);
            }
        }
        sites
    }
}

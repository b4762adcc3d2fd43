//! Cost functions (spec.md §4.4): scalar distances between a system
//! tracker's correlation statistics and a target tracker's. A closed,
//! tagged enum — the "factory returns a function" shape from spec.md is
//! expressed here as "factory returns a `Cost` that captures baseline
//! state and exposes one `evaluate` method" (spec.md §9 design note).

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::tracker::{check_parity, DescriptorId, Tracker};

fn squared_dist(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| (a - b).powi(2)).sum()
}

fn descriptor_mean_dist<A: Tracker + ?Sized, B: Tracker + ?Sized>(a: &A, b: &B, id: DescriptorId) -> f64 {
    squared_dist(&a.correlation_for(id).mean(), &b.correlation_for(id).mean())
}

fn descriptor_directional_dist<A: Tracker + ?Sized, B: Tracker + ?Sized>(a: &A, b: &B, id: DescriptorId) -> f64 {
    let ca = a.correlation_for(id);
    let cb = b.correlation_for(id);
    (0..ca.num_directions()).map(|d| squared_dist(ca.for_direction(d), cb.for_direction(d))).sum()
}

fn sum_mean<A: Tracker + ?Sized, B: Tracker + ?Sized>(system: &A, target: &B) -> f64 {
    system.tracked_descriptors().iter().map(|&id| descriptor_mean_dist(system, target, id)).sum()
}

fn sum_directional<A: Tracker + ?Sized, B: Tracker + ?Sized>(system: &A, target: &B) -> f64 {
    system.tracked_descriptors().iter().map(|&id| descriptor_directional_dist(system, target, id)).sum()
}

/// The three descriptor ids the Čapek family baselines against: S₂ at
/// phase 0, L₂ at phase 1 (the solid phase's lineal path), L₂ at phase 0
/// (the void phase's lineal path).
#[derive(Debug, Clone, Copy)]
struct CapekBaseline {
    s2_solid: DescriptorId,
    l2_solid: DescriptorId,
    l2_void: DescriptorId,
    eta_prime: f64,
}

#[derive(Debug, Clone)]
pub enum Cost {
    /// Average each descriptor's correlation across directions, then sum
    /// squared-Euclidean distances across descriptors (spec.md §4.4).
    EuclidMean,
    /// Sum squared-Euclidean distances per direction, without averaging,
    /// then across descriptors. Both trackers must report identical
    /// direction sets (spec.md §4.4).
    EuclidDirectional,
    /// `euclid_mean`, each descriptor's contribution normalized by its
    /// baseline distance at construction time.
    EuclidMeanWeighted(HashMap<DescriptorId, f64>),
    /// `euclid_directional`, normalized the same way.
    EuclidDirectionalWeighted(HashMap<DescriptorId, f64>),
    /// Time-dependent Čapek cost (spec.md §4.4): `s2 + l2s + l2v * eta' /
    /// (eta' + s2 + l2s)`.
    Capek(CapekBaseline),
    /// Čapek cost with additional baselined descriptor contributions.
    GeneralizedCapek(CapekBaseline, Vec<(DescriptorId, f64)>),
}

impl Cost {
    pub fn euclid_mean() -> Self {
        Cost::EuclidMean
    }

    pub fn euclid_directional() -> Self {
        Cost::EuclidDirectional
    }

    /// Baseline each tracked descriptor's distance between `system` and
    /// `target` at construction time; rejects a zero baseline rather than
    /// dividing by it later (spec.md §9 open question).
    pub fn euclid_mean_weighted<A: Tracker, B: Tracker>(system: &A, target: &B) -> CoreResult<Self> {
        Self::weighted(system, target, descriptor_mean_dist).map(Cost::EuclidMeanWeighted)
    }

    pub fn euclid_directional_weighted<A: Tracker, B: Tracker>(system: &A, target: &B) -> CoreResult<Self> {
        Self::weighted(system, target, descriptor_directional_dist).map(Cost::EuclidDirectionalWeighted)
    }

    fn weighted<A: Tracker, B: Tracker>(
        system: &A,
        target: &B,
        dist: impl Fn(&A, &B, DescriptorId) -> f64,
    ) -> CoreResult<HashMap<DescriptorId, f64>> {
        check_parity(system, target)?;
        let mut weights = HashMap::new();
        for &id in system.tracked_descriptors() {
            let w = dist(system, target, id);
            if w == 0.0 {
                return Err(CoreError::ZeroBaseline(id));
            }
            weights.insert(id, w);
        }
        Ok(weights)
    }

    /// `eta` controls how strongly the void-phase lineal path is pulled
    /// into the objective as the solid-phase terms converge (spec.md
    /// §4.4). `system` and `target` must both track `S2(phase 0)` and
    /// `L2(phase 1)`/`L2(phase 0)`.
    pub fn capek<A: Tracker, B: Tracker>(system: &A, target: &B, eta: f64) -> CoreResult<Self> {
        check_parity(system, target)?;
        let baseline = Self::capek_baseline(system, target, eta);
        Ok(Cost::Capek(baseline))
    }

    /// Same baselining as [`Cost::capek`], plus extra descriptor
    /// contributions each controlled by its own `eta_k`.
    pub fn generalized_capek<A: Tracker, B: Tracker>(system: &A, target: &B, eta: f64, dict: Vec<(DescriptorId, f64)>) -> CoreResult<Self> {
        check_parity(system, target)?;
        let baseline = Self::capek_baseline(system, target, eta);
        let s2_init_plus_l2_init = descriptor_directional_dist(system, target, baseline.s2_solid)
            + descriptor_directional_dist(system, target, baseline.l2_solid);
        let extra = dict.into_iter().map(|(id, eta_k)| (id, eta_k * s2_init_plus_l2_init)).collect();
        Ok(Cost::GeneralizedCapek(baseline, extra))
    }

    fn capek_baseline<A: Tracker, B: Tracker>(system: &A, target: &B, eta: f64) -> CapekBaseline {
        let s2_solid = DescriptorId::s2(0);
        let l2_solid = DescriptorId::l2(1);
        let l2_void = DescriptorId::l2(0);
        let s2_init = descriptor_directional_dist(system, target, s2_solid);
        let l2_init = descriptor_directional_dist(system, target, l2_solid);
        CapekBaseline { s2_solid, l2_solid, l2_void, eta_prime: eta * (s2_init + l2_init) }
    }

    fn capek_term<A: Tracker + ?Sized, B: Tracker + ?Sized>(baseline: &CapekBaseline, system: &A, target: &B) -> (f64, f64, f64) {
        let s2 = descriptor_directional_dist(system, target, baseline.s2_solid);
        let l2s = descriptor_directional_dist(system, target, baseline.l2_solid);
        let l2v = descriptor_directional_dist(system, target, baseline.l2_void);
        let denom = baseline.eta_prime + s2 + l2s;
        let fraction = if denom > 0.0 { baseline.eta_prime / denom } else { 1.0 };
        (s2, l2s, l2v * fraction)
    }

    pub fn evaluate<A: Tracker, B: Tracker>(&self, system: &A, target: &B) -> f64 {
        match self {
            Cost::EuclidMean => sum_mean(system, target),
            Cost::EuclidDirectional => sum_directional(system, target),
            Cost::EuclidMeanWeighted(weights) => system
                .tracked_descriptors()
                .iter()
                .map(|&id| descriptor_mean_dist(system, target, id) / weights[&id])
                .sum(),
            Cost::EuclidDirectionalWeighted(weights) => system
                .tracked_descriptors()
                .iter()
                .map(|&id| descriptor_directional_dist(system, target, id) / weights[&id])
                .sum(),
            Cost::Capek(baseline) => {
                let (s2, l2s, term3) = Self::capek_term(baseline, system, target);
                s2 + l2s + term3
            }
            Cost::GeneralizedCapek(baseline, extra) => {
                let (s2, l2s, term3) = Self::capek_term(baseline, system, target);
                let extra_sum: f64 = extra
                    .iter()
                    .map(|&(id, eta_k_prime)| {
                        let d = descriptor_directional_dist(system, target, id);
                        let denom_k = eta_k_prime + s2 + l2s;
                        let fraction = if denom_k > 0.0 { eta_k_prime / denom_k } else { 1.0 };
                        d * fraction
                    })
                    .sum();
                s2 + l2s + term3 + extra_sum
            }
        }
    }
}

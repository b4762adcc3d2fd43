//! Modifier strategies (spec.md §4.3): propose a local mutation via a
//! sampler, and reverse it on rejection. A closed, tagged enum — same
//! rationale as `sampler::Sampler`.

use rand::Rng;

use crate::error::CoreResult;
use crate::sampler::Sampler;
use crate::tracker::{RollbackToken, SingleRollback, Tracker};

#[derive(Debug, Clone)]
pub enum Modifier {
    /// Flip one site's phase (spec.md §4.3).
    Flipper(Sampler),
    /// Swap two sites of opposing phase (spec.md §4.3).
    Swapper(Sampler),
}

fn expect_single(token: RollbackToken) -> SingleRollback {
    match token {
        RollbackToken::Single(s) => s,
        RollbackToken::Pair(..) => unreachable!("Tracker::update always returns a Single token"),
    }
}

impl Modifier {
    pub fn flipper(sampler: Sampler) -> Self {
        Modifier::Flipper(sampler)
    }

    pub fn swapper(sampler: Sampler) -> Self {
        Modifier::Swapper(sampler)
    }

    /// Propose a mutation, writing it through `tracker`, and return a token
    /// sufficient to reverse it.
    pub fn modify<T: Tracker, R: Rng + ?Sized>(&mut self, tracker: &mut T, rng: &mut R) -> CoreResult<RollbackToken> {
        match self {
            Modifier::Flipper(sampler) => {
                let idx = sampler.sample(tracker, rng)?;
                let old = tracker.read(&idx);
                sampler.update_pre(tracker, &idx);
                let token = tracker.update(1 - old, &idx)?;
                sampler.update_post(tracker, &idx);
                Ok(token)
            }
            Modifier::Swapper(sampler) => {
                let idx1 = sampler.sample(tracker, rng)?;
                let v1 = tracker.read(&idx1);
                let idx2 = loop {
                    let candidate = sampler.sample(tracker, rng)?;
                    if tracker.read(&candidate) != v1 {
                        break candidate;
                    }
                };
                let v2 = tracker.read(&idx2);

                sampler.update_pre(tracker, &idx1);
                let token1 = expect_single(tracker.update(v2, &idx1)?);
                sampler.update_post(tracker, &idx1);

                sampler.update_pre(tracker, &idx2);
                let token2 = expect_single(tracker.update(v1, &idx2)?);
                sampler.update_post(tracker, &idx2);

                Ok(RollbackToken::Pair(Box::new(token1), Box::new(token2)))
            }
        }
    }

    /// Reverse a proposal. For `Swapper`, the two site writes are undone in
    /// reverse order so the tracker's intermediate states mirror the
    /// forward path (spec.md §4.3); the sampler's `update_pre`/`update_post`
    /// bracket each individual undo, the same as they bracketed the
    /// original writes, so stateful sampler state rewinds exactly too.
    pub fn reject<T: Tracker>(&mut self, tracker: &mut T, token: RollbackToken) {
        match self {
            Modifier::Flipper(sampler) => {
                let RollbackToken::Single(single) = token else {
                    unreachable!("Flipper always produces a Single token")
                };
                let idx = single.idx.clone();
                sampler.update_pre(tracker, &idx);
                tracker.rollback(RollbackToken::Single(single));
                sampler.update_post(tracker, &idx);
            }
            Modifier::Swapper(sampler) => {
                let RollbackToken::Pair(first, second) = token else {
                    unreachable!("Swapper always produces a Pair token")
                };
                let idx2 = second.idx.clone();
                sampler.update_pre(tracker, &idx2);
                tracker.rollback(RollbackToken::Single(*second));
                sampler.update_post(tracker, &idx2);

                let idx1 = first.idx.clone();
                sampler.update_pre(tracker, &idx1);
                tracker.rollback(RollbackToken::Single(*first));
                sampler.update_post(tracker, &idx1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::grid::{Boundary, Grid};
    use crate::tracker::{DescriptorId, DescriptorSpec, GridTracker};
    use ndarray::ArrayD;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn random_tracker(n: usize, seed: u64) -> GridTracker {
        use rand::Rng as _;
        let mut rng = SmallRng::seed_from_u64(seed);
        let data = ArrayD::from_shape_fn(ndarray::IxDyn(&[n, n]), |_| rng.random_range(0u8..=1));
        let grid = Grid::from_array(data, Boundary::Periodic);
        GridTracker::new(
            grid,
            Direction::standard_2d(),
            vec![
                DescriptorSpec { id: DescriptorId::s2(0), length: 3 },
                DescriptorSpec { id: DescriptorId::l2(1), length: 3 },
            ],
        )
    }

    #[test]
    fn flipper_changes_phase_fraction_by_one() {
        let mut tracker = random_tracker(6, 1);
        let before = tracker.grid().count_ones();
        let mut modifier = Modifier::flipper(Sampler::uniform());
        let mut rng = SmallRng::seed_from_u64(42);
        modifier.modify(&mut tracker, &mut rng).unwrap();
        let after = tracker.grid().count_ones();
        assert_eq!((after as i64 - before as i64).abs(), 1);
    }

    #[test]
    fn swapper_preserves_phase_fraction() {
        let mut tracker = random_tracker(6, 2);
        let before = tracker.grid().count_ones();
        let mut modifier = Modifier::swapper(Sampler::uniform());
        let mut rng = SmallRng::seed_from_u64(99);
        modifier.modify(&mut tracker, &mut rng).unwrap();
        let after = tracker.grid().count_ones();
        assert_eq!(before, after);
    }

    /// Drives `modify` then `reject` for `trials` seeds, asserting the
    /// tracker's grid and every tracked correlation vector come back
    /// bitwise identical (spec.md §8 property 1, scenario S6). Generic over
    /// both the modifier and the sampler so every (modifier, sampler)
    /// combination spec.md §8 calls out can share one check.
    fn assert_reject_is_exact_inverse(
        trials: u64,
        make_sampler: impl Fn(&GridTracker) -> Sampler,
        make_modifier: fn(Sampler) -> Modifier,
    ) {
        for seed in 0..trials {
            let mut tracker = random_tracker(6, seed);
            let snapshot_grid = tracker.grid().clone();
            let snapshot_corr: Vec<_> = tracker
                .tracked_descriptors()
                .iter()
                .map(|&d| tracker.correlation_for(d).clone())
                .collect();

            let sampler = make_sampler(&tracker);
            let mut modifier = make_modifier(sampler);
            let mut rng = SmallRng::seed_from_u64(seed + 1000);
            let token = modifier.modify(&mut tracker, &mut rng).unwrap();
            modifier.reject(&mut tracker, token);

            assert_eq!(tracker.grid().raw(), snapshot_grid.raw());
            for (&id, before) in tracker.tracked_descriptors().to_vec().iter().zip(&snapshot_corr) {
                assert_eq!(tracker.correlation_for(id).for_direction(0), before.for_direction(0));
            }
        }
    }

    #[test]
    fn reject_is_exact_inverse_flipper_uniform() {
        assert_reject_is_exact_inverse(20, |_| Sampler::uniform(), Modifier::flipper);
    }

    #[test]
    fn reject_is_exact_inverse_flipper_interface() {
        assert_reject_is_exact_inverse(20, |_| Sampler::interface(), Modifier::flipper);
    }

    #[test]
    fn reject_is_exact_inverse_flipper_dpn() {
        assert_reject_is_exact_inverse(20, |t| Sampler::dpn(t, 1.2), Modifier::flipper);
    }

    #[test]
    fn reject_is_exact_inverse_swapper_uniform() {
        assert_reject_is_exact_inverse(20, |_| Sampler::uniform(), Modifier::swapper);
    }

    #[test]
    fn reject_is_exact_inverse_swapper_interface() {
        assert_reject_is_exact_inverse(20, |_| Sampler::interface(), Modifier::swapper);
    }

    #[test]
    fn reject_is_exact_inverse_swapper_dpn() {
        assert_reject_is_exact_inverse(20, |t| Sampler::dpn(t, 1.2), Modifier::swapper);
    }
}

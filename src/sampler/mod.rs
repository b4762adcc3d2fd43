//! Sampler strategies (spec.md §4.2): polymorphic over `{sample, update_pre,
//! update_post}`. Following the teacher's design-note guidance, this is a
//! closed, tagged enum dispatched at the driver boundary rather than a
//! trait object — the variant set is fixed and small.

mod dpn;

pub use dpn::Dpn;

use rand::Rng;

use crate::error::{CoreError, CoreResult};
use crate::ray::{LineRay, UnitDirection};
use crate::tracker::Tracker;

const DEFAULT_INTERFACE_RETRIES: u32 = 1024;

#[derive(Debug, Clone)]
pub enum Sampler {
    /// Stateless: uniformly random lattice index.
    Uniform,
    /// Stateless: draws a seed, walks a ray, returns the first site whose
    /// phase differs from the seed's (spec.md §4.2).
    Interface { max_retries: u32 },
    /// Stateful: different-phase-neighbor histogram (spec.md §4.2).
    Dpn(Dpn),
}

impl Sampler {
    pub fn uniform() -> Self {
        Sampler::Uniform
    }

    pub fn interface() -> Self {
        Sampler::Interface { max_retries: DEFAULT_INTERFACE_RETRIES }
    }

    pub fn interface_with_retries(max_retries: u32) -> Self {
        Sampler::Interface { max_retries }
    }

    pub fn dpn<T: Tracker>(tracker: &T, alpha: f64) -> Self {
        Sampler::Dpn(Dpn::new(tracker, alpha))
    }

    /// Draw one in-bounds lattice site.
    pub fn sample<T: Tracker, R: Rng + ?Sized>(&self, tracker: &T, rng: &mut R) -> CoreResult<Vec<usize>> {
        match self {
            Sampler::Uniform => Ok(uniform_sample(tracker, rng)),
            Sampler::Interface { max_retries } => interface_sample(tracker, rng, *max_retries),
            Sampler::Dpn(s) => s.sample(tracker, rng),
        }
    }

    /// Notify a stateful sampler that `idx` is about to be written (called
    /// with the tracker still holding the pre-write value).
    pub fn update_pre<T: Tracker>(&mut self, tracker: &T, idx: &[usize]) {
        if let Sampler::Dpn(s) = self {
            s.update_pre(tracker, idx);
        }
    }

    /// Notify a stateful sampler that `idx` was just written (called with
    /// the tracker already holding the post-write value).
    pub fn update_post<T: Tracker>(&mut self, tracker: &T, idx: &[usize]) {
        if let Sampler::Dpn(s) = self {
            s.update_post(tracker, idx);
        }
    }
}

fn uniform_sample<T: Tracker, R: Rng + ?Sized>(tracker: &T, rng: &mut R) -> Vec<usize> {
    tracker.shape().iter().map(|&extent| rng.random_range(0..extent)).collect()
}

fn interface_sample<T: Tracker, R: Rng + ?Sized>(tracker: &T, rng: &mut R, max_retries: u32) -> CoreResult<Vec<usize>> {
    let dim = tracker.shape().len();
    // Bound the inner walk so a ray over a periodic (never-exiting) tracker
    // still terminates this attempt; a ray longer than twice the largest
    // axis has certainly wrapped past any interface it was going to meet.
    let inner_cap = 2 * tracker.shape().iter().copied().max().unwrap_or(1);

    for _ in 0..max_retries {
        let seed = uniform_sample(tracker, rng);
        let seed_phase = tracker.read(&seed);
        let dir = UnitDirection::random(dim, rng);
        let ray = LineRay::new(&seed, dir);

        for point in ray.skip(1).take(inner_cap) {
            match tracker.locate(&point) {
                Some(idx) => {
                    if tracker.read(&idx) != seed_phase {
                        return Ok(idx);
                    }
                }
                None => break, // ray left a clamped tracker; retry from a new seed
            }
        }
    }

    Err(CoreError::NoInterface(max_retries))
}

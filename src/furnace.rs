//! The annealing driver (spec.md §4.7): a single Metropolis step over an
//! immutable `Furnace` record.

use rand::Rng;

use crate::cooldown::Cooldown;
use crate::cost::Cost;
use crate::error::{CoreError, CoreResult};
use crate::modifier::Modifier;
use crate::tracker::{check_parity, GridTracker};

/// Relative tolerance used when asserting the post-rollback cost matches
/// the pre-proposal cost (spec.md §4.4 "Numerics", §7 "Cost regression").
const COST_REGRESSION_TOLERANCE: f64 = 1e-6;

/// An immutable record of (system, target, temperature, step counters).
/// `step` consumes one `Furnace` and produces the next; the Furnace
/// exclusively owns its two trackers for the session (spec.md §5).
#[derive(Debug, Clone)]
pub struct Furnace {
    system: GridTracker,
    target: GridTracker,
    temperature: f64,
    steps: u64,
    accepted: u64,
    rejected: u64,
}

impl Furnace {
    /// Pair a system and target tracker for one annealing session. Rejects
    /// the pairing if the two trackers don't carry the same descriptor and
    /// direction sets (spec.md §3, §7 "Configuration mismatch") — every
    /// cost function in this crate assumes that parity holds for the
    /// lifetime of the session, so it is checked once here rather than on
    /// every `step`.
    pub fn new(system: GridTracker, target: GridTracker, temperature: f64) -> CoreResult<Self> {
        check_parity(&system, &target)?;
        Ok(Self { system, target, temperature, steps: 0, accepted: 0, rejected: 0 })
    }

    pub fn system(&self) -> &GridTracker {
        &self.system
    }

    pub fn target(&self) -> &GridTracker {
        &self.target
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

/// Run one Metropolis step: propose a mutation via `modifier`, accept it
/// outright if it does not raise `cost`, accept it probabilistically if it
/// does, otherwise reject and roll back; cool only on a non-rejected step
/// (spec.md §4.7).
pub fn step<R: Rng + ?Sized>(
    furnace: Furnace,
    cost: &Cost,
    modifier: &mut Modifier,
    cooldown: &mut dyn Cooldown,
    rng: &mut R,
) -> CoreResult<Furnace> {
    let Furnace { mut system, target, temperature, steps, mut accepted, mut rejected } = furnace;

    let c1 = cost.evaluate(&system, &target);
    let token = modifier.modify(&mut system, rng)?;
    let c2 = cost.evaluate(&system, &target);

    let mut rejected_this_step = false;
    if c2 <= c1 {
        // downhill or flat: accept without counting toward `accepted`
        // (spec.md §4.7 step 4 leaves both counters unchanged here).
    } else {
        let p = (-(c2 - c1) / temperature).exp();
        let u: f64 = rng.random();
        if u <= p {
            accepted += 1;
        } else {
            modifier.reject(&mut system, token);
            let recomputed = cost.evaluate(&system, &target);
            if (recomputed - c1).abs() > COST_REGRESSION_TOLERANCE * c1.abs().max(1.0) {
                return Err(CoreError::CostRegression { pre: c1, post: recomputed, tolerance: COST_REGRESSION_TOLERANCE });
            }
            rejected += 1;
            rejected_this_step = true;
        }
    }

    let next_temperature = if rejected_this_step { temperature } else { cooldown.update(temperature, c2) };

    Ok(Furnace { system, target, temperature: next_temperature, steps: steps + 1, accepted, rejected })
}

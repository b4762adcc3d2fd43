//! The correlation tracker interface (spec.md §6).
//!
//! spec.md treats the tracker as an external collaborator, specified only
//! through this interface: a grid plus a set of tracked correlation
//! statistics, with element reads/writes and an undoable incremental-update
//! protocol. `grid_tracker` ships one concrete, fully-working
//! implementation (`GridTracker`) so the rest of the core can be built and
//! tested against something real.

mod descriptor;
mod grid_tracker;

pub use descriptor::{direction_index, CorrelationData, CorrelationKind, DescriptorId, DescriptorSpec};
pub use grid_tracker::GridTracker;

use std::collections::BTreeSet;

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};

/// Sufficient state to undo one site write and restore a tracker's
/// correlation statistics bit-for-bit (spec.md §3 "Rollback token").
#[derive(Debug, Clone)]
pub enum RollbackToken {
    /// A single-site write (Flipper).
    Single(SingleRollback),
    /// Two single-site writes applied in order (Swapper); `reject` must
    /// replay them in reverse order (spec.md §4.3).
    Pair(Box<SingleRollback>, Box<SingleRollback>),
}

/// One site's worth of undo state: where it was written, what it held
/// before, and the correlation deltas that write produced (flattened, one
/// entry per `(descriptor, direction, r)` slot in the tracker's own layout).
#[derive(Debug, Clone)]
pub struct SingleRollback {
    pub idx: Vec<usize>,
    pub prior_value: u8,
    pub(crate) deltas: Vec<DescriptorDelta>,
}

#[derive(Debug, Clone)]
pub(crate) struct DescriptorDelta {
    pub descriptor_idx: usize,
    pub direction_idx: usize,
    /// Change applied to `numerator[r]` for `r in 0..deltas.len()`.
    pub per_r: Vec<f64>,
}

/// The correlation-tracker interface consumed by the rest of the core.
pub trait Tracker {
    fn shape(&self) -> &[usize];

    fn len(&self) -> usize {
        self.shape().iter().product()
    }

    fn is_periodic(&self) -> bool;

    fn read(&self, idx: &[usize]) -> u8;

    /// Resolve a signed lattice coordinate (as produced by a `LineRay`) into
    /// an in-bounds index, wrapping per this tracker's boundary policy, or
    /// `None` if it falls outside a clamped tracker. Not part of spec.md's
    /// §6 interface listing verbatim, but required by any sampler that
    /// walks a ray against the `Tracker` trait rather than a concrete
    /// `Grid` (spec.md §4.1, §4.2 "Interface" sampler).
    fn locate(&self, point: &[i64]) -> Option<Vec<usize>>;

    /// Write `value` at `idx`, updating every tracked correlation
    /// incrementally, and return a token sufficient to reverse the write.
    fn update(&mut self, value: u8, idx: &[usize]) -> CoreResult<RollbackToken>;

    /// Reverse a previously-returned update. After `update` then
    /// `rollback`, the tracker must be bitwise identical (grid and every
    /// correlation vector) to its pre-update state.
    fn rollback(&mut self, token: RollbackToken);

    fn tracked_descriptors(&self) -> &[DescriptorId];

    fn correlation_for(&self, descriptor: DescriptorId) -> &CorrelationData;

    fn directions(&self, descriptor: DescriptorId) -> &[Direction];
}

/// Verify two trackers carry the same tracked descriptor set and, for each
/// shared descriptor, the same direction set (spec.md §3: "Two trackers
/// used together in a cost function must carry the same set of tracked
/// descriptors and directions; violation is a programmer error", §7
/// "Configuration mismatch"). Costs and `Furnace::new` call this once at
/// construction time rather than on every annealing step, since the pairing
/// does not change over a session's lifetime.
pub fn check_parity<A: Tracker + ?Sized, B: Tracker + ?Sized>(a: &A, b: &B) -> CoreResult<()> {
    let a_ids: BTreeSet<DescriptorId> = a.tracked_descriptors().iter().copied().collect();
    let b_ids: BTreeSet<DescriptorId> = b.tracked_descriptors().iter().copied().collect();
    if a_ids != b_ids {
        return Err(CoreError::ConfigMismatch(format!(
            "tracked descriptor sets differ: {:?} vs {:?}",
            a.tracked_descriptors(),
            b.tracked_descriptors()
        )));
    }
    for &id in a.tracked_descriptors() {
        let da: Vec<&str> = a.directions(id).iter().map(|d| d.label.as_str()).collect();
        let db: Vec<&str> = b.directions(id).iter().map(|d| d.label.as_str()).collect();
        if da != db {
            return Err(CoreError::ConfigMismatch(format!(
                "direction sets differ for descriptor {id:?}: {da:?} vs {db:?}"
            )));
        }
    }
    Ok(())
}

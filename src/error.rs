//! Typed errors for the annealing core.
//!
//! spec.md describes most failure modes as "fatal precondition violations" —
//! appropriate language for an embedded engine, but a library cannot abort
//! its caller's process. Each such violation becomes a `CoreError` variant
//! instead; callers that want spec.md's original "just crash" behavior can
//! `.unwrap()` at the boundary.

use thiserror::Error;

/// Errors surfaced by the annealing core's public API.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two trackers passed to a cost function carry different descriptor or
    /// direction sets (spec.md §3, §7: "programmer error").
    #[error("tracker configuration mismatch: {0}")]
    ConfigMismatch(String),

    /// A weighted cost factory baselined a descriptor at distance zero,
    /// which would make the weighted term divide by zero (spec.md §9 Open
    /// Question, resolved: reject at construction rather than propagate NaN).
    #[error("zero baseline distance for descriptor {0:?}, cannot construct weighted cost")]
    ZeroBaseline(crate::tracker::DescriptorId),

    /// The interface sampler could not find a phase boundary within its
    /// retry budget (spec.md §4.2, §7).
    #[error("interface sampler found no phase boundary after {0} retries")]
    NoInterface(u32),

    /// A DPN sampler was asked to draw from an empty histogram bucket,
    /// indicating the incremental histogram maintenance has drifted from the
    /// true grid state (spec.md §4.2, §7).
    #[error("DPN histogram bucket {0} is empty but was selected for sampling")]
    DpnInvariant(usize),

    /// After a rejected proposal was rolled back, the recomputed cost did
    /// not match the pre-proposal cost within tolerance (spec.md §4.4, §7).
    #[error("cost regression after rollback: pre={pre}, post={post}, tolerance={tolerance}")]
    CostRegression {
        pre: f64,
        post: f64,
        tolerance: f64,
    },

    /// An index produced by a sampler or ray fell outside the tracker's grid.
    #[error("index {0:?} out of bounds for grid shape {1:?}")]
    OutOfBounds(Vec<usize>, Vec<usize>),

    /// The grid shape requested of an initializer was invalid (e.g. zero
    /// sites, or dimensionality not in {2, 3}).
    #[error("invalid grid shape {0:?}: {1}")]
    InvalidShape(Vec<usize>, String),
}

pub type CoreResult<T> = Result<T, CoreError>;

//! Correlation descriptors: what a tracker measures (spec.md §3 "tracked
//! correlation descriptors").

use crate::direction::Direction;

/// Which correlation function a descriptor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum CorrelationKind {
    /// Two-point probability S₂(r).
    S2,
    /// Lineal-path probability L₂(r).
    L2,
}

/// Identifies one tracked descriptor: a correlation kind at a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct DescriptorId {
    pub kind: CorrelationKind,
    pub phase: u8,
}

impl DescriptorId {
    pub fn s2(phase: u8) -> Self {
        Self { kind: CorrelationKind::S2, phase }
    }

    pub fn l2(phase: u8) -> Self {
        Self { kind: CorrelationKind::L2, phase }
    }
}

/// A descriptor plus its bounded correlation length `0..=length`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DescriptorSpec {
    pub id: DescriptorId,
    pub length: usize,
}

/// Per-direction correlation values for one descriptor, indexed
/// `[direction_index][r]` for `r` in `0..=length`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CorrelationData {
    pub(crate) per_direction: Vec<Vec<f64>>,
}

impl CorrelationData {
    pub fn new(per_direction: Vec<Vec<f64>>) -> Self {
        Self { per_direction }
    }

    /// The correlation vector for one direction (by index into the
    /// tracker's `directions()` list).
    pub fn for_direction(&self, d: usize) -> &[f64] {
        &self.per_direction[d]
    }

    pub fn num_directions(&self) -> usize {
        self.per_direction.len()
    }

    pub fn length(&self) -> usize {
        self.per_direction.first().map(|v| v.len().saturating_sub(1)).unwrap_or(0)
    }

    /// Average this descriptor's correlation values across directions,
    /// elementwise, to a single vector of length `length + 1`.
    pub fn mean(&self) -> Vec<f64> {
        let n = self.per_direction.len();
        if n == 0 {
            return Vec::new();
        }
        let len = self.per_direction[0].len();
        let mut out = vec![0.0; len];
        for v in &self.per_direction {
            for (o, &x) in out.iter_mut().zip(v) {
                *o += x;
            }
        }
        for o in out.iter_mut() {
            *o /= n as f64;
        }
        out
    }
}

/// Resolve a list of `Direction`s into indices understood by a tracker.
/// Used when costs/descriptors need to compare by direction label rather
/// than position.
pub fn direction_index(directions: &[Direction], label: &str) -> Option<usize> {
    directions.iter().position(|d| d.label == label)
}

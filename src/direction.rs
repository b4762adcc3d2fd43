//! Direction tags used to index per-direction correlation vectors
//! (spec.md §6: "directions(descriptor) -> list of direction tags").
//!
//! These are distinct from the continuous random direction the Line-ray
//! iterator samples (see `ray.rs`): a `Direction` here is a fixed lattice
//! step shared by every descriptor on a tracker, e.g. the `{x, y, xy, yx}`
//! set from spec.md §8 scenario S1.

/// A named unit lattice step, e.g. `x = [1, 0]`, `xy = [1, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Direction {
    pub label: String,
    pub step: Vec<i64>,
}

impl Direction {
    pub fn new(label: impl Into<String>, step: Vec<i64>) -> Self {
        Self {
            label: label.into(),
            step,
        }
    }

    /// The `n`-th axis-aligned unit step in `dim` dimensions, labeled by the
    /// conventional axis name (`x`, `y`, `z`) when `dim <= 3`.
    pub fn axis(n: usize, dim: usize) -> Self {
        let mut step = vec![0i64; dim];
        step[n] = 1;
        let label = ["x", "y", "z"].get(n).map(|s| s.to_string()).unwrap_or_else(|| format!("e{n}"));
        Self { label, step }
    }

    /// The standard scenario-S1 direction set for 2-D grids: `{x, y, xy, yx}`.
    pub fn standard_2d() -> Vec<Self> {
        vec![
            Self::new("x", vec![1, 0]),
            Self::new("y", vec![0, 1]),
            Self::new("xy", vec![1, 1]),
            Self::new("yx", vec![1, -1]),
        ]
    }

    /// A minimal axis-aligned direction set for 3-D grids: `{x, y, z}`.
    pub fn standard_3d() -> Vec<Self> {
        vec![
            Self::axis(0, 3),
            Self::axis(1, 3),
            Self::axis(2, 3),
        ]
    }
}

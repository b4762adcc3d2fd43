//! The dense N-dimensional binary lattice (spec.md §3: "Grid").

use ndarray::{ArrayD, IxDyn};

/// Boundary treatment for indices that step outside the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Boundary {
    /// Out-of-range coordinates saturate to the nearest valid index.
    Clamped,
    /// Out-of-range coordinates wrap modulo the axis extent.
    Periodic,
}

/// A dense N-dimensional (N ∈ {2, 3}) array of phase values in `{0, 1}`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    data: ArrayD<u8>,
    boundary: Boundary,
}

impl Grid {
    /// Build a grid from raw phase data. Values are not validated to be
    /// exactly 0/1; callers that read untrusted data should check first.
    pub fn from_array(data: ArrayD<u8>, boundary: Boundary) -> Self {
        Self { data, boundary }
    }

    /// An all-zero grid of the given shape (2-D or 3-D).
    pub fn zeros(shape: &[usize], boundary: Boundary) -> Self {
        Self {
            data: ArrayD::zeros(IxDyn(shape)),
            boundary,
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        matches!(self.boundary, Boundary::Periodic)
    }

    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Read the phase at a (valid, in-bounds) multi-index.
    #[inline]
    pub fn read(&self, idx: &[usize]) -> u8 {
        self.data[IxDyn(idx)]
    }

    /// Write the phase at a (valid, in-bounds) multi-index, returning the
    /// prior value.
    #[inline]
    pub fn write(&mut self, idx: &[usize], value: u8) -> u8 {
        let slot = &mut self.data[IxDyn(idx)];
        let old = *slot;
        *slot = value;
        old
    }

    /// Count of sites with phase 1.
    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    pub fn raw(&self) -> &ArrayD<u8> {
        &self.data
    }

    /// Map a possibly out-of-range signed lattice coordinate back into
    /// `0..extent` per this grid's boundary policy. Returns `None` for
    /// `Clamped` grids when the coordinate is out of range (the caller is
    /// expected to treat that as "outside the grid").
    #[inline]
    pub fn wrap_coord(&self, axis: usize, coord: i64) -> Option<usize> {
        let extent = self.data.shape()[axis] as i64;
        if extent == 0 {
            return None;
        }
        match self.boundary {
            Boundary::Periodic => Some(coord.rem_euclid(extent) as usize),
            Boundary::Clamped => {
                if coord < 0 || coord >= extent {
                    None
                } else {
                    Some(coord as usize)
                }
            }
        }
    }

    /// Apply `wrap_coord` across every axis of a signed lattice point,
    /// yielding an in-bounds index or `None` if any axis fell outside a
    /// clamped boundary.
    pub fn wrap_point(&self, point: &[i64]) -> Option<Vec<usize>> {
        point
            .iter()
            .enumerate()
            .map(|(axis, &c)| self.wrap_coord(axis, c))
            .collect()
    }
}

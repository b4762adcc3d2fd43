//! Simulated-annealing core for two-phase random-media reconstruction:
//! evolves a discrete binary N-dimensional grid until its spatial
//! correlation functions match a target grid's.

pub mod cooldown;
pub mod cost;
pub mod direction;
pub mod error;
pub mod furnace;
pub mod grid;
pub mod initializer;
pub mod modifier;
pub mod ray;
pub mod sampler;
pub mod tracker;
pub mod util;

pub mod examples;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use cooldown::Cooldown;
pub use cost::Cost;
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use furnace::{step, Furnace};
pub use grid::{Boundary, Grid};
pub use modifier::Modifier;
pub use sampler::Sampler;
pub use tracker::{DescriptorId, DescriptorSpec, GridTracker, Tracker};

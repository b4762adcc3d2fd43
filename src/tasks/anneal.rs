//! Parametrized annealing runner shared by the `examples` demos
//! (spec.md §8 scenarios S1–S3). Mirrors the teacher's `tasks::*::run`
//! shape: a long-running job reporting progress via `indicatif` and
//! persisting periodic snapshots to `output_path`.

use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::cooldown::Cooldown;
use crate::cost::Cost;
use crate::furnace::{self, Furnace};
use crate::modifier::Modifier;
use crate::tracker::GridTracker;

#[derive(Debug, Serialize)]
struct StepRecord {
    step: u64,
    cost: f64,
    temperature: f64,
}

/// Anneal `initial_system` toward `target` for `steps` Metropolis steps,
/// saving a cost/temperature snapshot every `save_interval` steps to
/// `output_path/history.json` (skipped if `output_path` is `None`).
#[allow(clippy::too_many_arguments)]
pub fn run(
    target: GridTracker,
    initial_system: GridTracker,
    mut modifier: Modifier,
    cost: Cost,
    mut cooldown: impl Cooldown,
    steps: u64,
    temperature0: f64,
    save_interval: u64,
    output_path: Option<&Path>,
    seed: u64,
) -> anyhow::Result<Furnace> {
    let mut furnace = Furnace::new(initial_system, target, temperature0).context("pairing system and target trackers")?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut history = Vec::new();

    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message("annealing");

    for i in 0..steps {
        furnace = furnace::step(furnace, &cost, &mut modifier, &mut cooldown, &mut rng)
            .with_context(|| format!("annealing step {i} failed"))?;

        if i % save_interval == 0 {
            let c = cost.evaluate(furnace.system(), furnace.target());
            history.push(StepRecord { step: furnace.steps(), cost: c, temperature: furnace.temperature() });
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    if let Some(path) = output_path {
        std::fs::create_dir_all(path).with_context(|| format!("creating output directory {path:?}"))?;
        let file = std::fs::File::create(path.join("history.json")).context("creating history.json")?;
        serde_json::to_writer_pretty(file, &history).context("writing history.json")?;
    }

    Ok(furnace)
}

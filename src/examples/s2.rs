//! spec.md §8 scenario S2: swap/interface against the same target as S1
//! under exponential cooling. Expected: phase fraction unchanged at step
//! 10 000 (Swapper preserves it by construction).

pub fn run() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::cooldown::Exponential;
    use crate::cost::Cost;
    use crate::direction::Direction;
    use crate::initializer::initialize_random;
    use crate::modifier::Modifier;
    use crate::sampler::Sampler;
    use crate::tasks::fixtures::value_noise_pattern;
    use crate::tracker::{DescriptorId, DescriptorSpec, GridTracker};

    const SHAPE: (usize, usize) = (300, 300);
    const LENGTH: usize = 20;
    const T0: f64 = 1.0;

    let target_grid = value_noise_pattern(SHAPE, 12, 1);
    let descriptors = vec![
        DescriptorSpec { id: DescriptorId::s2(0), length: LENGTH },
        DescriptorSpec { id: DescriptorId::s2(1), length: LENGTH },
        DescriptorSpec { id: DescriptorId::l2(0), length: LENGTH },
        DescriptorSpec { id: DescriptorId::l2(1), length: LENGTH },
    ];
    let target = GridTracker::new(target_grid, Direction::standard_2d(), descriptors);

    let mut rng = SmallRng::seed_from_u64(42);
    let system = initialize_random(&target, None, &mut rng);

    let modifier = Modifier::swapper(Sampler::interface());
    let cost = Cost::euclid_mean();
    let cooldown = Exponential::new(0.999999);

    let output_path = std::path::Path::new("output/scenario_s2");
    if let Err(err) = crate::tasks::anneal::run(target, system, modifier, cost, cooldown, 10_000, T0, 500, Some(output_path), 7) {
        eprintln!("scenario_s2 failed: {err:#}");
        std::process::exit(1);
    }
}

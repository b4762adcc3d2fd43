//! spec.md §8 scenario S1: flip/interface against a fixed pattern under
//! Aarts–Korst cooling. Expected: final `euclid_directional` cost below
//! the initial cost.

pub fn run() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::cooldown::AartsKorst;
    use crate::cost::Cost;
    use crate::direction::Direction;
    use crate::initializer::initialize_random;
    use crate::modifier::Modifier;
    use crate::sampler::Sampler;
    use crate::tasks::fixtures::value_noise_pattern;
    use crate::tracker::{DescriptorId, DescriptorSpec, GridTracker};

    const SHAPE: (usize, usize) = (300, 300);
    const LENGTH: usize = 20;
    // spec.md gives the cooldown's (n, lambda) but not an initial
    // temperature for S1; chosen here and recorded in DESIGN.md.
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

    let modifier = Modifier::flipper(Sampler::interface());
    let cost = Cost::euclid_directional();
    let cooldown = AartsKorst::new(15, 0.01);

    let output_path = std::path::Path::new("output/scenario_s1");
    if let Err(err) = crate::tasks::anneal::run(target, system, modifier, cost, cooldown, 10_000, T0, 500, Some(output_path), 7) {
        eprintln!("scenario_s1 failed: {err:#}");
        std::process::exit(1);
    }
}

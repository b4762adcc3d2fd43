//! Line-ray iterator (spec.md §4.1).
//!
//! Given a seed site and a uniformly random direction on the (N-1)-sphere,
//! lazily emits the infinite sequence of lattice sites obtained by stepping
//! outward along the ray. The first site is the seed; each subsequent site
//! advances the real parameter `r` by `sqrt(N)` and floors the continuous
//! position into lattice coordinates. Emitted sites may leave the grid
//! bounds — consumers must bounds-check (this iterator never terminates).

use rand::Rng;

/// A continuous unit direction in 2 or 3 dimensions.
#[derive(Debug, Clone, Copy)]
pub enum UnitDirection {
    Two([f64; 2]),
    Three([f64; 3]),
}

impl UnitDirection {
    /// Draw a uniformly random direction on the (N-1)-sphere.
    pub fn random<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Self {
        match dim {
            2 => {
                let theta = rng.random_range(0.0..std::f64::consts::TAU);
                UnitDirection::Two([theta.cos(), theta.sin()])
            }
            3 => {
                // Uniform on the sphere: azimuth uniform, cos(elevation) uniform.
                let phi = rng.random_range(0.0..std::f64::consts::TAU);
                let cos_theta = rng.random_range(-1.0..=1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
                UnitDirection::Three([sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta])
            }
            other => panic!("UnitDirection::random: unsupported dimensionality {other}"),
        }
    }

    #[inline]
    fn as_slice(&self) -> &[f64] {
        match self {
            UnitDirection::Two(v) => v,
            UnitDirection::Three(v) => v,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.as_slice().len()
    }
}

/// Lazy, infinite iterator over lattice sites along a ray from a seed site.
pub struct LineRay {
    seed: Vec<f64>,
    dir: UnitDirection,
    r: f64,
    step: f64,
    first: bool,
}

impl LineRay {
    pub fn new(seed: &[usize], dir: UnitDirection) -> Self {
        assert_eq!(seed.len(), dir.dim(), "seed and direction dimensionality must match");
        let dim = seed.len();
        Self {
            seed: seed.iter().map(|&x| x as f64).collect(),
            dir,
            r: 0.0,
            step: (dim as f64).sqrt(),
            first: true,
        }
    }

    /// Convenience constructor: seed plus a freshly drawn random direction.
    pub fn from_random_direction<R: Rng + ?Sized>(seed: &[usize], rng: &mut R) -> Self {
        Self::new(seed, UnitDirection::random(seed.len(), rng))
    }
}

impl Iterator for LineRay {
    /// Signed lattice coordinates; may be negative or exceed the grid.
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.first {
            self.first = false;
            return Some(self.seed.iter().map(|&x| x.floor() as i64).collect());
        }
        self.r += self.step;
        let dir = self.dir.as_slice();
        Some(
            self.seed
                .iter()
                .zip(dir)
                .map(|(&s, &d)| (s + self.r * d).floor() as i64)
                .collect(),
        )
    }
}

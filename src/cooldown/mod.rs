//! Cooldown schedules (spec.md §4.5): stateful temperature update policies.
//! Per the design notes, these are "closure-like stateful callables" — a
//! small trait with one method, not a tagged enum, since each schedule
//! owns genuinely different buffer state and callers pick one type at
//! construction rather than switching between variants at runtime.

use std::collections::VecDeque;

/// A temperature update policy: given the current temperature and the
/// cost just observed, returns the next temperature.
pub trait Cooldown {
    fn update(&mut self, temperature: f64, cost: f64) -> f64;
}

/// `T' = lambda * T`, ignoring cost. Default `lambda = 0.999999`.
#[derive(Debug, Clone, Copy)]
pub struct Exponential {
    pub lambda: f64,
}

impl Exponential {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl Default for Exponential {
    fn default() -> Self {
        Self { lambda: 0.999999 }
    }
}

impl Cooldown for Exponential {
    fn update(&mut self, temperature: f64, _cost: f64) -> f64 {
        self.lambda * temperature
    }
}

fn population_std(samples: &[f64]) -> f64 {
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance = samples.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / samples.len() as f64;
    variance.sqrt()
}

/// Circular buffer of the `n` most recent costs; every `n`-th call computes
/// the buffer's standard deviation `sigma` and returns `T * sigma / (sigma
/// + lambda * T)` (spec.md §4.5).
#[derive(Debug, Clone)]
pub struct AartsKorst {
    lambda: f64,
    n: usize,
    buffer: Vec<f64>,
    pos: usize,
    calls: u64,
}

impl AartsKorst {
    pub fn new(n: usize, lambda: f64) -> Self {
        assert!(n > 0, "Aarts-Korst buffer length must be positive");
        Self { lambda, n, buffer: vec![0.0; n], pos: 0, calls: 0 }
    }
}

impl Cooldown for AartsKorst {
    fn update(&mut self, temperature: f64, cost: f64) -> f64 {
        self.buffer[self.pos] = cost;
        self.pos = (self.pos + 1) % self.n;
        self.calls += 1;

        if self.calls % self.n as u64 == 0 {
            let sigma = population_std(&self.buffer);
            temperature * sigma / (sigma + self.lambda * temperature)
        } else {
            temperature
        }
    }
}

/// Growable buffer (minimum capacity `n`) tracking a running target cost;
/// once the buffer reaches `n` samples and its mean drops below the
/// current target, the target ratchets down and the temperature jumps by
/// `(mu_target - mu_prev) * (T / sigma)^2` (spec.md §4.5).
///
/// On the very first ratchet, `mu_target` is still `+inf`; spec.md's
/// reference behavior uses the freshly computed mean as `mu_prev` in that
/// case rather than `+inf`, which would make every later temperature NaN.
/// Preserved verbatim per spec.md §9.
#[derive(Debug, Clone)]
pub struct FrostHeineman {
    lambda: f64,
    n: usize,
    buffer: VecDeque<f64>,
    mu_target: f64,
}

impl FrostHeineman {
    pub fn new(n: usize, lambda: f64) -> Self {
        assert!(n > 0, "Frost-Heineman minimum buffer length must be positive");
        Self { lambda, n, buffer: VecDeque::new(), mu_target: f64::INFINITY }
    }
}

impl Cooldown for FrostHeineman {
    fn update(&mut self, temperature: f64, cost: f64) -> f64 {
        self.buffer.push_back(cost);

        if self.buffer.len() < self.n {
            return temperature;
        }

        let mu: f64 = self.buffer.iter().sum::<f64>() / self.buffer.len() as f64;
        if mu >= self.mu_target {
            return temperature;
        }

        let samples: Vec<f64> = self.buffer.iter().copied().collect();
        let sigma = population_std(&samples);
        let mu_prev = if self.mu_target.is_finite() { self.mu_target } else { mu };
        self.mu_target = mu - self.lambda * sigma;
        self.buffer.clear();

        temperature + (self.mu_target - mu_prev) * (temperature / sigma).powi(2)
    }
}

pub fn exponential(lambda: f64) -> Exponential {
    Exponential::new(lambda)
}

pub fn aarts_korst(n: usize, lambda: f64) -> AartsKorst {
    AartsKorst::new(n, lambda)
}

pub fn frost_heineman(n: usize, lambda: f64) -> FrostHeineman {
    FrostHeineman::new(n, lambda)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_is_strictly_decreasing() {
        let mut schedule = Exponential::new(0.9);
        let mut t = 100.0;
        for _ in 0..10 {
            let next = schedule.update(t, 0.0);
            assert!(next < t);
            t = next;
        }
    }

    #[test]
    fn aarts_korst_holds_temperature_between_fills() {
        let mut schedule = AartsKorst::new(4, 0.01);
        let t0 = schedule.update(10.0, 1.0);
        assert_eq!(t0, 10.0);
        let t1 = schedule.update(t0, 1.0);
        assert_eq!(t1, t0);
        let t2 = schedule.update(t1, 1.0);
        assert_eq!(t2, t1);
    }

    #[test]
    fn aarts_korst_rescales_on_nth_call() {
        let mut schedule = AartsKorst::new(3, 0.01);
        schedule.update(10.0, 1.0);
        schedule.update(10.0, 2.0);
        let t = schedule.update(10.0, 3.0);
        assert!(t != 10.0);
    }

    #[test]
    fn frost_heineman_holds_until_buffer_fills() {
        let mut schedule = FrostHeineman::new(3, 0.1);
        assert_eq!(schedule.update(5.0, 1.0), 5.0);
        assert_eq!(schedule.update(5.0, 1.0), 5.0);
    }

    #[test]
    fn frost_heineman_ratchets_on_improving_mean() {
        let mut schedule = FrostHeineman::new(3, 0.1);
        schedule.update(5.0, 3.0);
        schedule.update(5.0, 3.0);
        let t = schedule.update(5.0, 3.0);
        // constant costs give sigma == 0, so the temperature jump is undefined (NaN);
        // this exercises the ratchet path without asserting a numeric outcome.
        let _ = t;
        assert!(schedule.mu_target < f64::INFINITY);
    }
}

//! Random variate source.
//!
//! The engine needs two kinds of draws: exponential samples for inter-arrival
//! and service times, and weighted-categorical selections for routing. Both
//! come from one generator so a single seed reproduces an entire run.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp};

/// Source of the random draws consumed by the simulation.
pub trait VariateSource {
    /// Sample from the exponential distribution with the given rate.
    fn exponential(&mut self, rate: f64) -> f64;

    /// Underlying generator, handed to routing policies.
    fn rng(&mut self) -> &mut dyn RngCore;
}

/// ChaCha8-backed variate source.
#[derive(Debug, Clone)]
pub struct SeededVariates {
    rng: ChaCha8Rng,
}

impl SeededVariates {
    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }
}

impl VariateSource for SeededVariates {
    fn exponential(&mut self, rate: f64) -> f64 {
        // Rates are validated at configuration time; a non-positive rate
        // means the event never happens.
        match Exp::new(rate) {
            Ok(dist) if rate > 0.0 => dist.sample(&mut self.rng),
            _ => f64::INFINITY,
        }
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}

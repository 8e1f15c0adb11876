//! Self-adaptive per-particle strategy weights.

use serde::{Deserialize, Serialize};

use crate::random::RandomStream;

/// Six strategy parameters carried by every particle.
///
/// Five live in `[0, 1]`; `d_velocity` lives in `[0, max_velocity]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weight {
    /// Inertia applied to the previous velocity
    pub p_inertia: f64,
    /// Pull toward the personal best
    pub p_memory: f64,
    /// Pull toward the (perturbed) global best
    pub p_cooperation: f64,
    /// Magnitude of the multiplicative global-best perturbation
    pub p_perturbation: f64,
    /// Crossover probability of the recombination step
    pub d_threshold: f64,
    /// Differential step size of the recombination step
    pub d_velocity: f64,
}

impl Weight {
    /// Uniform draw of all six fields, `d_velocity` scaled by `max_velocity`.
    pub fn random(rng: &mut impl RandomStream, max_velocity: f64) -> Self {
        Self {
            p_inertia: rng.uniform(),
            p_memory: rng.uniform(),
            p_cooperation: rng.uniform(),
            p_perturbation: rng.uniform(),
            d_threshold: rng.uniform(),
            d_velocity: rng.uniform() * max_velocity,
        }
    }

    /// Gaussian perturbation of every field, hard-clipped to its range.
    ///
    /// Clipping piles probability mass on the range ends over long runs; that
    /// bias is accepted.
    #[must_use]
    pub fn mutated(&self, rng: &mut impl RandomStream, mutation_rate: f64, max_velocity: f64) -> Self {
        Self {
            p_inertia: perturb(self.p_inertia, rng, mutation_rate, 1.0),
            p_memory: perturb(self.p_memory, rng, mutation_rate, 1.0),
            p_cooperation: perturb(self.p_cooperation, rng, mutation_rate, 1.0),
            p_perturbation: perturb(self.p_perturbation, rng, mutation_rate, 1.0),
            d_threshold: perturb(self.d_threshold, rng, mutation_rate, 1.0),
            d_velocity: perturb(self.d_velocity, rng, mutation_rate, max_velocity),
        }
    }

    /// Whether every field lies within its declared range.
    #[must_use]
    pub fn in_range(&self, max_velocity: f64) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.p_inertia)
            && unit.contains(&self.p_memory)
            && unit.contains(&self.p_cooperation)
            && unit.contains(&self.p_perturbation)
            && unit.contains(&self.d_threshold)
            && (0.0..=max_velocity).contains(&self.d_velocity)
    }
}

fn perturb(value: f64, rng: &mut impl RandomStream, mutation_rate: f64, max: f64) -> f64 {
    let v = value + rng.normal() * mutation_rate;
    if v < 0.0 {
        0.0
    } else if v > max {
        max
    } else {
        v
    }
}

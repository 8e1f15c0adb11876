//! Particle populations.

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::primitives::Matrix;
use crate::random::RandomStream;
use crate::weight::Weight;

/// Fixed-size, fixed-dimension set of particles.
///
/// Row `i` of `positions` and `velocities` together with `weights[i]` form
/// particle slot `i`. Size and dimension never change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    positions: Matrix,
    velocities: Matrix,
    weights: Vec<Weight>,
}

impl Population {
    /// Zeroed population.
    #[must_use]
    pub fn zeros(size: usize, dims: usize) -> Self {
        Self {
            positions: Matrix::zeros(size, dims),
            velocities: Matrix::zeros(size, dims),
            weights: vec![Weight::default(); size],
        }
    }

    /// Population drawn uniformly inside `bounds`.
    ///
    /// All weights are drawn first, then positions and velocities particle by
    /// particle, dimension by dimension.
    pub fn random(
        size: usize,
        bounds: &Bounds,
        max_velocity: f64,
        rng: &mut impl RandomStream,
    ) -> Self {
        let dims = bounds.dims();
        let mut pop = Self::zeros(size, dims);

        for w in &mut pop.weights {
            *w = Weight::random(rng, max_velocity);
        }

        for i in 0..size {
            for j in 0..dims {
                let x = bounds.x_min[j] + (bounds.x_max[j] - bounds.x_min[j]) * rng.uniform();
                let v = bounds.v_min[j] + (bounds.v_max[j] - bounds.v_min[j]) * rng.uniform();
                pop.positions.set(i, j, x);
                pop.velocities.set(i, j, v);
            }
        }

        pop
    }

    /// Number of particles.
    #[must_use]
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    /// Search-space dimension.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.positions.n_cols()
    }

    /// All positions, one row per particle.
    #[must_use]
    pub fn positions(&self) -> &Matrix {
        &self.positions
    }

    /// All velocities, one row per particle.
    #[must_use]
    pub fn velocities(&self) -> &Matrix {
        &self.velocities
    }

    /// All weights.
    #[must_use]
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Position of particle `i`.
    #[must_use]
    pub fn position(&self, i: usize) -> &[f64] {
        self.positions.row(i)
    }

    /// Mutable position of particle `i`.
    pub fn position_mut(&mut self, i: usize) -> &mut [f64] {
        self.positions.row_mut(i)
    }

    /// Velocity of particle `i`.
    #[must_use]
    pub fn velocity(&self, i: usize) -> &[f64] {
        self.velocities.row(i)
    }

    /// Mutable velocity of particle `i`.
    pub fn velocity_mut(&mut self, i: usize) -> &mut [f64] {
        self.velocities.row_mut(i)
    }

    /// Weight of particle `i`.
    #[must_use]
    pub fn weight(&self, i: usize) -> &Weight {
        &self.weights[i]
    }

    /// Mutable weight of particle `i`.
    pub fn weight_mut(&mut self, i: usize) -> &mut Weight {
        &mut self.weights[i]
    }

    /// Position and velocity of particle `i`, borrowed together.
    pub fn state_mut(&mut self, i: usize) -> (&mut [f64], &mut [f64]) {
        (self.positions.row_mut(i), self.velocities.row_mut(i))
    }

    /// Copy position, velocity and weight of slot `src` in `other` into slot `dst`.
    pub fn copy_slot_from(&mut self, other: &Self, src: usize, dst: usize) {
        self.positions.copy_row_from(&other.positions, src, dst);
        self.velocities.copy_row_from(&other.velocities, src, dst);
        self.weights[dst] = other.weights[src];
    }
}

/// Index of the smallest value; `NaN` entries lose to any number.
///
/// Ties keep the earliest index. Returns 0 for an empty slice.
#[must_use]
pub fn index_of_min(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] || (values[best].is_nan() && !v.is_nan()) {
            best = i;
        }
    }
    best
}

/// Index of the largest value; `NaN` entries count as worst of all.
///
/// Ties keep the earliest index. Returns 0 for an empty slice.
#[must_use]
pub fn index_of_max(values: &[f64]) -> usize {
    let mut worst = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if values[worst].is_nan() {
            break;
        }
        if v > values[worst] || v.is_nan() {
            worst = i;
        }
    }
    worst
}

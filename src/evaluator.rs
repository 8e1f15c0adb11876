//! Fitness evaluation protocol.
//!
//! An evaluator scores a batch of particles but only the ones whose
//! needs-recompute flag is set; unflagged entries of the fitness array must be
//! left untouched. With no flag set an evaluation is a no-op.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::benchmarks;
use crate::error::{CdeepsoError, Result};
use crate::primitives::Matrix;

/// Batched, flag-gated objective scorer. Lower fitness is better.
pub trait FitnessEvaluator {
    /// Write `fitness[i]` for every `i` with `needs_recompute[i]` set.
    fn evaluate(&mut self, positions: &Matrix, needs_recompute: &[bool], fitness: &mut [f64]);
}

impl<F> FitnessEvaluator for F
where
    F: FnMut(&Matrix, &[bool], &mut [f64]),
{
    fn evaluate(&mut self, positions: &Matrix, needs_recompute: &[bool], fitness: &mut [f64]) {
        self(positions, needs_recompute, fitness);
    }
}

/// Adapts a per-particle objective `f(x) -> fitness` into a batch evaluator.
///
/// # Example
///
/// ```
/// use cdeepso::evaluator::{FitnessEvaluator, Pointwise};
/// use cdeepso::primitives::Matrix;
///
/// let positions = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("2x2");
/// let mut fitness = vec![-1.0, -1.0];
/// let mut eval = Pointwise(|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>());
/// eval.evaluate(&positions, &[false, true], &mut fitness);
/// assert_eq!(fitness, vec![-1.0, 25.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Pointwise<F>(pub F);

impl<F> FitnessEvaluator for Pointwise<F>
where
    F: FnMut(&[f64]) -> f64,
{
    fn evaluate(&mut self, positions: &Matrix, needs_recompute: &[bool], fitness: &mut [f64]) {
        for (i, (row, flag)) in positions.rows().zip(needs_recompute).enumerate() {
            if *flag {
                fitness[i] = (self.0)(row);
            }
        }
    }
}

/// Named benchmark objectives selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Objective {
    /// Sum of squares
    Sphere,
    /// Rastrigin
    #[default]
    Rastrigin,
    /// Rosenbrock
    Rosenbrock,
    /// Griewank
    Griewank,
    /// Ackley
    Ackley,
}

impl Objective {
    const TABLE: [(&'static str, Self); 10] = [
        ("sph", Self::Sphere),
        ("sphere", Self::Sphere),
        ("ras", Self::Rastrigin),
        ("rastrigin", Self::Rastrigin),
        ("ros", Self::Rosenbrock),
        ("rosenbrock", Self::Rosenbrock),
        ("gri", Self::Griewank),
        ("griewank", Self::Griewank),
        ("ack", Self::Ackley),
        ("ackley", Self::Ackley),
    ];

    /// All objectives.
    pub const ALL: [Self; 5] = [
        Self::Sphere,
        Self::Rastrigin,
        Self::Rosenbrock,
        Self::Griewank,
        Self::Ackley,
    ];

    /// Short identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sphere => "sph",
            Self::Rastrigin => "ras",
            Self::Rosenbrock => "ros",
            Self::Griewank => "gri",
            Self::Ackley => "ack",
        }
    }

    /// Score a single position.
    #[must_use]
    pub fn value(self, x: &[f64]) -> f64 {
        match self {
            Self::Sphere => benchmarks::sphere(x),
            Self::Rastrigin => benchmarks::rastrigin(x),
            Self::Rosenbrock => benchmarks::rosenbrock(x),
            Self::Griewank => benchmarks::griewank(x),
            Self::Ackley => benchmarks::ackley(x),
        }
    }
}

impl FromStr for Objective {
    type Err = CdeepsoError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::TABLE
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, objective)| *objective)
            .ok_or_else(|| {
                CdeepsoError::invalid(
                    "objective",
                    s,
                    "one of sph, ras, ros, gri, ack (or the full names)",
                )
            })
    }
}

impl TryFrom<String> for Objective {
    type Error = CdeepsoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Objective> for String {
    fn from(value: Objective) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FitnessEvaluator for Objective {
    fn evaluate(&mut self, positions: &Matrix, needs_recompute: &[bool], fitness: &mut [f64]) {
        let objective = *self;
        Pointwise(|x: &[f64]| objective.value(x)).evaluate(positions, needs_recompute, fitness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Matrix {
        Matrix::from_vec(3, 2, vec![0.0, 0.0, 1.0, 1.0, 2.0, -1.0]).expect("3x2")
    }

    #[test]
    fn test_pointwise_only_flagged() {
        let mut fitness = vec![9.0, 9.0, 9.0];
        let mut eval = Pointwise(benchmarks::sphere);
        eval.evaluate(&grid(), &[true, false, true], &mut fitness);
        assert_eq!(fitness, vec![0.0, 9.0, 5.0]);
    }

    #[test]
    fn test_no_flags_is_noop() {
        let mut fitness = vec![1.0, 2.0, 3.0];
        let mut calls = 0;
        let mut eval = Pointwise(|x: &[f64]| {
            calls += 1;
            benchmarks::sphere(x)
        });
        eval.evaluate(&grid(), &[false, false, false], &mut fitness);
        assert_eq!(fitness, vec![1.0, 2.0, 3.0]);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_batch_closure_is_evaluator() {
        let mut fitness = vec![0.0; 3];
        let mut eval = |positions: &Matrix, flags: &[bool], out: &mut [f64]| {
            for i in 0..positions.n_rows() {
                if flags[i] {
                    out[i] = positions.row(i)[0];
                }
            }
        };
        eval.evaluate(&grid(), &[true, true, true], &mut fitness);
        assert_eq!(fitness, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_objective_lookup() {
        assert_eq!("ras".parse::<Objective>().ok(), Some(Objective::Rastrigin));
        assert_eq!("ROS".parse::<Objective>().ok(), Some(Objective::Rosenbrock));
        assert_eq!("griewank".parse::<Objective>().ok(), Some(Objective::Griewank));

        let err = "foo".parse::<Objective>().unwrap_err();
        assert_eq!(err.field(), Some("objective"));
    }

    #[test]
    fn test_objective_round_trips_identifier() {
        for objective in Objective::ALL {
            assert_eq!(objective.as_str().parse::<Objective>().ok(), Some(objective));
        }
    }

    #[test]
    fn test_objective_evaluator() {
        let mut fitness = vec![-1.0; 3];
        let mut objective = Objective::Sphere;
        objective.evaluate(&grid(), &[false, true, false], &mut fitness);
        assert_eq!(fitness, vec![-1.0, 2.0, -1.0]);
    }
}

//! Repeated independent runs and their statistics.
//!
//! Every trial owns a fresh optimizer and its own stream seeded with
//! `base_seed + trial index`, so results do not depend on scheduling.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::evaluator::Objective;
use crate::optimizer::{Cdeepso, RunResult};

/// Descriptive statistics of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
}

impl Summary {
    /// Summarize the finite entries of `values`.
    ///
    /// NaN and infinite entries (runs whose objective never produced a
    /// comparable value) are skipped so the summary stays serializable. A
    /// sample with no finite entry yields all zeros.
    ///
    /// # Example
    ///
    /// ```
    /// use cdeepso::trials::Summary;
    ///
    /// let s = Summary::of(&[1.0, 2.0, 3.0]);
    /// assert_eq!((s.min, s.max, s.mean), (1.0, 3.0, 2.0));
    /// ```
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                std: 0.0,
            };
        }

        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self {
            min: finite.iter().copied().fold(f64::INFINITY, f64::min),
            max: finite.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std: var.sqrt(),
        }
    }
}

/// One finished trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Trial index
    pub run: usize,
    /// Seed used, if any
    pub seed: Option<u64>,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: f64,
    /// Optimizer outcome
    pub result: RunResult,
}

/// All trials of a batch plus their statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialReport {
    /// Objective that was minimized
    pub objective: Objective,
    /// Configuration shared by every trial
    pub config: OptimizerConfig,
    /// Trials in index order
    pub trials: Vec<Trial>,
    /// Best-fitness statistics
    pub fitness: Summary,
    /// Duration statistics in milliseconds
    pub elapsed_ms: Summary,
    /// Wall-clock time of the whole batch in milliseconds
    pub total_ms: f64,
}

impl TrialReport {
    /// Trial with the lowest best fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Trial> {
        self.trials
            .iter()
            .min_by(|a, b| a.result.best_fitness.total_cmp(&b.result.best_fitness))
    }
}

/// Run `runs` independent trials of `objective`.
///
/// `threads == 1` runs them in order on the calling thread; `threads == 0`
/// uses rayon's default pool size.
///
/// # Errors
///
/// Returns an error when the configuration is invalid or the worker pool
/// cannot be built.
pub fn run_trials(
    config: &OptimizerConfig,
    objective: Objective,
    runs: usize,
    threads: usize,
) -> Result<TrialReport> {
    config.validate()?;
    info!(%objective, runs, threads, "starting trials");
    let start = Instant::now();

    let trials = if threads == 1 {
        (0..runs)
            .map(|run| run_one(config, objective, run))
            .collect::<Result<Vec<_>>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        pool.install(|| {
            (0..runs)
                .into_par_iter()
                .map(|run| run_one(config, objective, run))
                .collect::<Result<Vec<_>>>()
        })?
    };

    let fitness: Vec<f64> = trials.iter().map(|t| t.result.best_fitness).collect();
    let elapsed: Vec<f64> = trials.iter().map(|t| t.elapsed_ms).collect();

    Ok(TrialReport {
        objective,
        config: config.clone(),
        fitness: Summary::of(&fitness),
        elapsed_ms: Summary::of(&elapsed),
        total_ms: start.elapsed().as_secs_f64() * 1000.0,
        trials,
    })
}

fn run_one(config: &OptimizerConfig, objective: Objective, run: usize) -> Result<Trial> {
    let seed = config.seed.map(|base| base.wrapping_add(run as u64));
    let mut trial_config = config.clone();
    trial_config.seed = seed;

    let start = Instant::now();
    let mut optimizer = Cdeepso::new(trial_config)?;
    let mut evaluator = objective;
    let result = optimizer.optimize(&mut evaluator, None);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    debug!(
        run,
        best_fitness = result.best_fitness,
        evaluations = result.evaluations,
        elapsed_ms,
        "trial finished"
    );

    Ok(Trial {
        run,
        seed,
        elapsed_ms,
        result,
    })
}

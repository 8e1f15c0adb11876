//! The CDEEPSO engine.
//!
//! Two populations alternate every generation. The incumbent is the working
//! population; the challenger is rebuilt twice, first by differential
//! recombination and then by a weight-mutated swarm move, and merged back
//! slot by slot. Personal bests, the global best and the elite archive are
//! refreshed after each merge.
//!
//! # Example
//!
//! ```
//! use cdeepso::prelude::*;
//!
//! let config = OptimizerConfig::new()
//!     .with_dims(2)
//!     .with_population_size(6)
//!     .with_max_generations(30)
//!     .with_seed(42);
//!
//! let mut optimizer = Cdeepso::new(config).expect("valid config");
//! let result = optimizer.optimize(&mut Objective::Sphere, None);
//!
//! assert_eq!(result.generations, 30);
//! assert!(result.best_fitness < 0.5);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::bounds::Bounds;
use crate::config::OptimizerConfig;
use crate::elite::{
    unreached_if_nan, update_global_best, update_personal_best, EliteArchive, GlobalBest,
};
use crate::error::Result;
use crate::evaluator::FitnessEvaluator;
use crate::operators::{self, Candidate, RecombinationContext};
use crate::population::Population;
use crate::random::{RandomStream, SeededStream};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Generation cap reached
    MaxGenerations,
    /// Cumulative evaluation count went past its cap
    EvaluationBudget,
}

/// Read-only view handed to the progress observer.
#[derive(Debug, Clone, Copy)]
pub struct RunSnapshot<'a> {
    /// Cumulative evaluation count
    pub evaluations: usize,
    /// Best solution so far
    pub global_best: &'a GlobalBest,
    /// Incumbent population
    pub population: &'a Population,
    /// Incumbent fitness
    pub fitness: &'a [f64],
    /// Personal-best fitness per slot
    pub personal_best_fitness: &'a [f64],
    /// Elite archive
    pub archive: &'a EliteArchive,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Best position found
    pub best_position: Vec<f64>,
    /// Its fitness; `+inf` when no evaluation ever produced a comparable value
    #[serde(deserialize_with = "unreached::scalar")]
    pub best_fitness: f64,
    /// Evaluations spent
    pub evaluations: usize,
    /// Generations completed
    pub generations: usize,
    /// Global-best fitness after initialization and after every generation
    #[serde(deserialize_with = "unreached::series")]
    pub history: Vec<f64>,
    /// Why the run stopped
    pub termination: TerminationReason,
}

/// JSON has no infinity: serde_json writes an unreached best as `null`,
/// which reads back as `+inf`.
mod unreached {
    use serde::{Deserialize, Deserializer};

    pub fn scalar<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }

    pub fn series<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(d)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f64::INFINITY)).collect())
    }
}

/// Progress callback: `(generation index, snapshot)`.
pub type Observer<'o> = &'o mut dyn FnMut(usize, &RunSnapshot<'_>);

/// CDEEPSO optimizer.
///
/// Owns every piece of run state, including its random stream, so
/// independent runs never share anything.
#[derive(Debug, Clone)]
pub struct Cdeepso<R: RandomStream = SeededStream> {
    config: OptimizerConfig,
    bounds: Bounds,
    rng: R,

    population: Population,
    fitness: Vec<f64>,
    refresh: Vec<bool>,

    challenger: Population,
    challenger_fitness: Vec<f64>,
    challenger_refresh: Vec<bool>,

    personal_best: Population,
    personal_best_fitness: Vec<f64>,
    global_best: GlobalBest,
    archive: EliteArchive,

    candidates: Vec<Candidate>,
    evaluations: usize,
    generation: usize,
    initialized: bool,
    history: Vec<f64>,
}

impl Cdeepso<SeededStream> {
    /// Build from a configuration, seeding from `config.seed` or from entropy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CdeepsoError::InvalidConfiguration`] when validation fails.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        let rng = SeededStream::from_seed_or_entropy(config.seed);
        Self::with_stream(config, rng)
    }
}

impl<R: RandomStream> Cdeepso<R> {
    /// Build with an explicit random stream. `config.seed` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CdeepsoError::InvalidConfiguration`] when validation fails.
    pub fn with_stream(config: OptimizerConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let size = config.population_size;
        let dims = config.dims;

        Ok(Self {
            bounds: Bounds::uniform(dims, config.x_min, config.x_max),
            rng,
            population: Population::zeros(size, dims),
            fitness: vec![f64::INFINITY; size],
            refresh: vec![false; size],
            challenger: Population::zeros(size, dims),
            challenger_fitness: vec![f64::INFINITY; size],
            challenger_refresh: vec![false; size],
            personal_best: Population::zeros(size, dims),
            personal_best_fitness: vec![f64::INFINITY; size],
            global_best: GlobalBest::unset(dims),
            archive: EliteArchive::new(config.archive_size, dims),
            candidates: Vec::with_capacity(size + config.archive_size),
            evaluations: 0,
            generation: 0,
            initialized: false,
            history: Vec::new(),
            config,
        })
    }

    /// Draw the initial population, evaluate it and seed the bests.
    ///
    /// Resets every counter and the archive, so it can restart a run.
    pub fn initialize<E>(&mut self, evaluator: &mut E)
    where
        E: FitnessEvaluator + ?Sized,
    {
        debug!(
            dims = self.config.dims,
            population = self.config.population_size,
            archive = self.config.archive_size,
            strategy = %self.config.strategy,
            source = %self.config.candidate_source,
            merge = %self.config.merge_policy,
            max_generations = self.config.max_generations,
            max_evaluations = self.config.max_evaluations,
            "initializing run"
        );

        self.population = Population::random(
            self.config.population_size,
            &self.bounds,
            self.config.max_velocity,
            &mut self.rng,
        );
        self.fitness.fill(f64::INFINITY);
        self.challenger_fitness.fill(f64::INFINITY);
        self.challenger_refresh.fill(false);
        self.archive = EliteArchive::new(self.config.archive_size, self.config.dims);
        self.evaluations = 0;
        self.generation = 0;
        self.history.clear();

        self.refresh.fill(true);
        self.evaluations += evaluate_flagged(
            evaluator,
            &self.population,
            &mut self.refresh,
            &mut self.fitness,
        );

        self.personal_best.clone_from(&self.population);
        for (best, &f) in self.personal_best_fitness.iter_mut().zip(&self.fitness) {
            *best = unreached_if_nan(f);
        }
        self.global_best = GlobalBest::from_population(&self.population, &self.fitness);
        self.history.push(self.global_best.fitness);
        self.initialized = true;
    }

    /// Whether either budget is used up.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.generation >= self.config.max_generations
            || self.evaluations > self.config.max_evaluations
    }

    /// Run one generation. Initializes first if needed.
    pub fn step<E>(&mut self, evaluator: &mut E)
    where
        E: FitnessEvaluator + ?Sized,
    {
        if !self.initialized {
            self.initialize(evaluator);
        }

        self.challenger_fitness.copy_from_slice(&self.fitness);
        self.challenger_refresh.fill(false);

        let ctx = RecombinationContext {
            incumbent: &self.population,
            fitness: &self.fitness,
            personal_best: &self.personal_best,
            global_best: &self.global_best.position,
            archive: &self.archive,
            source: self.config.candidate_source,
        };
        let recombined = operators::recombine(
            self.config.strategy,
            &ctx,
            &mut self.challenger,
            &mut self.challenger_refresh,
            &mut self.candidates,
            &mut self.rng,
        );
        self.bounds.enforce(&mut self.challenger);
        self.evaluations += evaluate_flagged(
            evaluator,
            &self.challenger,
            &mut self.challenger_refresh,
            &mut self.challenger_fitness,
        );
        let replaced_by_recombination = self.merge_challenger();

        self.challenger.clone_from(&self.population);
        operators::mutate_weights(
            &mut self.challenger,
            self.config.mutation_rate,
            self.config.max_velocity,
            &mut self.rng,
        );
        operators::update_velocities(
            &mut self.challenger,
            &self.personal_best,
            &self.global_best.position,
            &self.bounds,
            self.config.communication_probability,
            &mut self.rng,
        );
        self.challenger_refresh.fill(true);
        self.evaluations += evaluate_flagged(
            evaluator,
            &self.challenger,
            &mut self.challenger_refresh,
            &mut self.challenger_fitness,
        );

        operators::update_velocities(
            &mut self.population,
            &self.personal_best,
            &self.global_best.position,
            &self.bounds,
            self.config.communication_probability,
            &mut self.rng,
        );
        self.refresh.fill(true);
        self.evaluations += evaluate_flagged(
            evaluator,
            &self.population,
            &mut self.refresh,
            &mut self.fitness,
        );

        let replaced_by_motion = self.merge_challenger();

        trace!(
            generation = self.generation,
            recombined,
            replaced_by_recombination,
            replaced_by_motion,
            "generation step"
        );

        let every = self.config.log_every;
        if every != 0 && self.generation % every == 0 {
            info!(
                generation = self.generation,
                best_fitness = self.global_best.fitness,
                evaluations = self.evaluations,
                budget = self.config.max_evaluations,
                "progress"
            );
        }

        self.history.push(self.global_best.fitness);
        self.generation += 1;
    }

    /// Merge the challenger into the incumbent and refresh every best.
    fn merge_challenger(&mut self) -> usize {
        let replaced = operators::merge(
            &self.challenger,
            &self.challenger_fitness,
            &mut self.population,
            &mut self.fitness,
            self.config.merge_policy,
        );
        update_personal_best(
            &self.population,
            &self.fitness,
            &mut self.personal_best,
            &mut self.personal_best_fitness,
        );
        update_global_best(
            &self.population,
            &self.fitness,
            &mut self.global_best,
            &mut self.archive,
        );
        replaced
    }

    /// Run until a budget is exhausted.
    ///
    /// Initializes first unless [`Cdeepso::initialize`] was already called.
    /// The observer, when given, sees every completed generation.
    pub fn optimize<E>(&mut self, evaluator: &mut E, mut observer: Option<Observer<'_>>) -> RunResult
    where
        E: FitnessEvaluator + ?Sized,
    {
        if !self.initialized {
            self.initialize(evaluator);
        }

        while !self.is_exhausted() {
            let index = self.generation;
            self.step(evaluator);

            if let Some(observe) = observer.as_mut() {
                observe(index, &self.snapshot());
            }
        }

        let termination = if self.evaluations > self.config.max_evaluations {
            TerminationReason::EvaluationBudget
        } else {
            TerminationReason::MaxGenerations
        };

        info!(
            generations = self.generation,
            best_fitness = self.global_best.fitness,
            evaluations = self.evaluations,
            budget = self.config.max_evaluations,
            ?termination,
            "optimization finished"
        );

        RunResult {
            best_position: self.global_best.position.clone(),
            best_fitness: self.global_best.fitness,
            evaluations: self.evaluations,
            generations: self.generation,
            history: self.history.clone(),
            termination,
        }
    }

    /// Read-only view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot<'_> {
        RunSnapshot {
            evaluations: self.evaluations,
            global_best: &self.global_best,
            population: &self.population,
            fitness: &self.fitness,
            personal_best_fitness: &self.personal_best_fitness,
            archive: &self.archive,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Cumulative evaluation count.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Generations completed.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best solution so far.
    #[must_use]
    pub fn global_best(&self) -> &GlobalBest {
        &self.global_best
    }

    /// Elite archive.
    #[must_use]
    pub fn archive(&self) -> &EliteArchive {
        &self.archive
    }

    /// Incumbent population.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Incumbent fitness.
    #[must_use]
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    /// Personal-best fitness per slot.
    #[must_use]
    pub fn personal_best_fitness(&self) -> &[f64] {
        &self.personal_best_fitness
    }

    /// Global-best fitness history.
    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

/// Evaluate flagged particles, count them and clear their flags.
fn evaluate_flagged<E>(
    evaluator: &mut E,
    pop: &Population,
    flags: &mut [bool],
    fitness: &mut [f64],
) -> usize
where
    E: FitnessEvaluator + ?Sized,
{
    evaluator.evaluate(pop.positions(), flags, fitness);

    let mut counted = 0;
    for flag in flags.iter_mut().filter(|flag| **flag) {
        *flag = false;
        counted += 1;
    }
    counted
}

#[cfg(test)]
#[path = "optimizer_tests.rs"]
mod tests;

//! CDEEPSO: hybrid differential-evolution / particle-swarm optimizer.
//!
//! Every particle carries its own self-adaptive strategy weights. Each
//! generation combines a differential recombination step over better-than-self
//! donors, a weight-mutated swarm move, greedy slot-wise merging and an elite
//! memory archive of historical global bests.
//!
//! # Quick Start
//!
//! ```
//! use cdeepso::prelude::*;
//!
//! let config = OptimizerConfig::new()
//!     .with_dims(4)
//!     .with_population_size(10)
//!     .with_strategy(DeStrategy::Best)
//!     .with_candidate_source(CandidateSource::PosMem)
//!     .with_max_generations(100)
//!     .with_seed(42);
//!
//! // Any `FnMut(&[f64]) -> f64` becomes a batch evaluator through `Pointwise`.
//! let mut evaluator = Pointwise(|x: &[f64]| x.iter().map(|v| v * v).sum::<f64>());
//! let mut optimizer = Cdeepso::new(config).unwrap();
//! let result = optimizer.optimize(&mut evaluator, None);
//!
//! assert!(result.best_fitness < 0.1);
//! ```
//!
//! # Modules
//!
//! - [`config`]: Run configuration, option enums and JSON load/save
//! - [`optimizer`]: The generation loop ([`Cdeepso`])
//! - [`operators`]: Recombination, swarm motion and merge
//! - [`population`]: Particle storage
//! - [`weight`]: Self-adaptive strategy weights
//! - [`bounds`]: Position and velocity limits
//! - [`elite`]: Personal bests, global best and the elite archive
//! - [`evaluator`]: Flag-gated fitness evaluation and named objectives
//! - [`benchmarks`]: Standard test functions
//! - [`trials`]: Parallel repeated runs and statistics
//! - [`random`]: Random stream abstraction

pub mod benchmarks;
pub mod bounds;
pub mod config;
pub mod elite;
pub mod error;
pub mod evaluator;
pub mod operators;
pub mod optimizer;
pub mod population;
pub mod prelude;
pub mod primitives;
pub mod random;
pub mod trials;
pub mod weight;

pub use config::{CandidateSource, DeStrategy, MergePolicy, OptimizerConfig};
pub use error::{CdeepsoError, Result};
pub use evaluator::{FitnessEvaluator, Objective, Pointwise};
pub use optimizer::{Cdeepso, RunResult, RunSnapshot, TerminationReason};
pub use trials::{run_trials, Summary, TrialReport};

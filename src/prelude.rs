//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use cdeepso::prelude::*;
//! ```

pub use crate::bounds::Bounds;
pub use crate::config::{CandidateSource, DeStrategy, MergePolicy, OptimizerConfig};
pub use crate::elite::{EliteArchive, GlobalBest};
pub use crate::error::{CdeepsoError, Result};
pub use crate::evaluator::{FitnessEvaluator, Objective, Pointwise};
pub use crate::optimizer::{Cdeepso, RunResult, RunSnapshot, TerminationReason};
pub use crate::population::Population;
pub use crate::primitives::Matrix;
pub use crate::random::{RandomStream, SeededStream};
pub use crate::trials::{run_trials, Summary, TrialReport};
pub use crate::weight::Weight;

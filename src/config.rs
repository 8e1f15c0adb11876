//! Optimizer configuration.
//!
//! Every knob of a run lives in [`OptimizerConfig`]. Named options
//! ([`DeStrategy`], [`CandidateSource`], [`MergePolicy`]) decode through
//! validated lookup tables, so an unknown name is reported as
//! [`CdeepsoError::InvalidConfiguration`] naming the offending field.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CdeepsoError, Result};

/// Looks `name` up case-insensitively in `table`.
fn decode<T: Copy>(field: &str, name: &str, table: &[(&str, T)]) -> Result<T> {
    let key = name.trim().to_ascii_uppercase();
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
        .ok_or_else(|| {
            let accepted: Vec<&str> = table.iter().map(|(n, _)| *n).collect();
            CdeepsoError::invalid(field, name, format!("one of {}", accepted.join(", ")))
        })
}

/// Differential recombination variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeStrategy {
    /// `a + F·(b - c)`, crossover toward the particle's personal best.
    Rand,
    /// `g_best + F·(a - b)`, crossover toward the global best.
    #[default]
    Best,
}

impl DeStrategy {
    const TABLE: [(&'static str, Self); 2] = [("RAND", Self::Rand), ("BEST", Self::Best)];

    /// Canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rand => "RAND",
            Self::Best => "BEST",
        }
    }

    /// Number of better-than-self candidates the variant needs.
    #[must_use]
    pub fn required_candidates(self) -> usize {
        match self {
            Self::Rand => 3,
            Self::Best => 2,
        }
    }
}

impl FromStr for DeStrategy {
    type Err = CdeepsoError;

    fn from_str(s: &str) -> Result<Self> {
        decode("strategy", s, &Self::TABLE)
    }
}

/// Where recombination looks for better-than-self donors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CandidateSource {
    /// Current population only.
    Pos,
    /// Elite memory archive only.
    #[default]
    Mem,
    /// Both archive and population.
    PosMem,
}

impl CandidateSource {
    const TABLE: [(&'static str, Self); 3] = [
        ("POS", Self::Pos),
        ("MEM", Self::Mem),
        ("POS_MEM", Self::PosMem),
    ];

    /// Canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pos => "POS",
            Self::Mem => "MEM",
            Self::PosMem => "POS_MEM",
        }
    }

    /// Whether the archive is scanned.
    #[must_use]
    pub fn uses_archive(self) -> bool {
        matches!(self, Self::Mem | Self::PosMem)
    }

    /// Whether the population is scanned.
    #[must_use]
    pub fn uses_population(self) -> bool {
        matches!(self, Self::Pos | Self::PosMem)
    }
}

impl FromStr for CandidateSource {
    type Err = CdeepsoError;

    fn from_str(s: &str) -> Result<Self> {
        decode("candidate_source", s, &Self::TABLE)
    }
}

/// What a merge does with the winning challenger's fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MergePolicy {
    /// Copy the challenger's fitness along with position, velocity and weight.
    #[default]
    CarryFitness,
    /// Leave the incumbent fitness untouched; it goes stale until the slot is
    /// re-evaluated.
    KeepIncumbentFitness,
}

impl MergePolicy {
    const TABLE: [(&'static str, Self); 2] = [
        ("CARRY_FITNESS", Self::CarryFitness),
        ("KEEP_INCUMBENT_FITNESS", Self::KeepIncumbentFitness),
    ];

    /// Canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CarryFitness => "CARRY_FITNESS",
            Self::KeepIncumbentFitness => "KEEP_INCUMBENT_FITNESS",
        }
    }
}

impl FromStr for MergePolicy {
    type Err = CdeepsoError;

    fn from_str(s: &str) -> Result<Self> {
        decode("merge_policy", s, &Self::TABLE)
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = CdeepsoError;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

string_conversions!(DeStrategy, CandidateSource, MergePolicy);

/// Configuration of a single optimization run.
///
/// # Example
///
/// ```
/// use cdeepso::config::{DeStrategy, OptimizerConfig};
///
/// let config = OptimizerConfig::default()
///     .with_dims(10)
///     .with_population_size(20)
///     .with_strategy(DeStrategy::Rand)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Search-space dimension
    pub dims: usize,
    /// Number of particles
    pub population_size: usize,
    /// Elite memory archive capacity
    pub archive_size: usize,
    /// Recombination variant
    pub strategy: DeStrategy,
    /// Donor pool for recombination
    pub candidate_source: CandidateSource,
    /// Standard deviation of weight mutation
    pub mutation_rate: f64,
    /// Probability that the cooperation term is active for a particle
    pub communication_probability: f64,
    /// Upper bound of the differential step weight
    pub max_velocity: f64,
    /// Lower position bound (all dimensions)
    pub x_min: f64,
    /// Upper position bound (all dimensions)
    pub x_max: f64,
    /// Generation cap
    pub max_generations: usize,
    /// Evaluation budget
    pub max_evaluations: usize,
    /// Merge fitness handling
    pub merge_policy: MergePolicy,
    /// Progress log period in generations (0 disables)
    pub log_every: usize,
    /// Random seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            dims: 50,
            population_size: 50,
            archive_size: 5,
            strategy: DeStrategy::Best,
            candidate_source: CandidateSource::Mem,
            mutation_rate: 0.5,
            communication_probability: 0.1,
            max_velocity: 2.0,
            x_min: -1.0,
            x_max: 1.0,
            max_generations: 50_000,
            max_evaluations: 100_000,
            merge_policy: MergePolicy::CarryFitness,
            log_every: 100,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search-space dimension.
    #[must_use]
    pub fn with_dims(mut self, dims: usize) -> Self {
        self.dims = dims;
        self
    }

    /// Set the number of particles.
    #[must_use]
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    /// Set the archive capacity.
    #[must_use]
    pub fn with_archive_size(mut self, archive_size: usize) -> Self {
        self.archive_size = archive_size;
        self
    }

    /// Set the recombination variant.
    #[must_use]
    pub fn with_strategy(mut self, strategy: DeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the donor pool.
    #[must_use]
    pub fn with_candidate_source(mut self, candidate_source: CandidateSource) -> Self {
        self.candidate_source = candidate_source;
        self
    }

    /// Set the weight mutation rate.
    #[must_use]
    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    /// Set the communication probability.
    #[must_use]
    pub fn with_communication_probability(mut self, probability: f64) -> Self {
        self.communication_probability = probability;
        self
    }

    /// Set the maximum differential step weight.
    #[must_use]
    pub fn with_max_velocity(mut self, max_velocity: f64) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Set the position bounds.
    #[must_use]
    pub fn with_bounds(mut self, x_min: f64, x_max: f64) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self
    }

    /// Set the generation cap.
    #[must_use]
    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Set the evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Set the merge fitness policy.
    #[must_use]
    pub fn with_merge_policy(mut self, merge_policy: MergePolicy) -> Self {
        self.merge_policy = merge_policy;
        self
    }

    /// Set the progress log period.
    #[must_use]
    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    /// Set random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`CdeepsoError::InvalidConfiguration`] for the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.dims == 0 {
            return Err(CdeepsoError::invalid("dims", self.dims, "at least 1"));
        }
        if self.population_size == 0 {
            return Err(CdeepsoError::invalid(
                "population_size",
                self.population_size,
                "at least 1",
            ));
        }
        if !self.mutation_rate.is_finite() || self.mutation_rate < 0.0 {
            return Err(CdeepsoError::invalid(
                "mutation_rate",
                self.mutation_rate,
                "a finite value >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.communication_probability) {
            return Err(CdeepsoError::invalid(
                "communication_probability",
                self.communication_probability,
                "a probability in [0, 1]",
            ));
        }
        if !self.max_velocity.is_finite() || self.max_velocity < 0.0 {
            return Err(CdeepsoError::invalid(
                "max_velocity",
                self.max_velocity,
                "a finite value >= 0",
            ));
        }
        if !self.x_min.is_finite() {
            return Err(CdeepsoError::invalid("x_min", self.x_min, "a finite value"));
        }
        if !self.x_max.is_finite() || self.x_max <= self.x_min {
            return Err(CdeepsoError::invalid(
                "x_max",
                self.x_max,
                format!("a finite value > x_min ({})", self.x_min),
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, malformed JSON, unknown option names or
    /// out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails on I/O or serialization errors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

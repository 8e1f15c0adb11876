//! Variation and selection operators of one generation.

pub mod motion;
pub mod recombination;
pub mod selection;

pub use motion::{mutate_weights, update_velocities};
pub use recombination::{collect_candidates, recombine, Candidate, RecombinationContext};
pub use selection::merge;

//! Greedy slot-wise replacement.

use crate::config::MergePolicy;
use crate::population::Population;

/// Overwrite incumbent slots that the challenger strictly beats.
///
/// Position, velocity and weight are always copied; the fitness value only
/// under [`MergePolicy::CarryFitness`]. Returns the number of replaced slots.
pub fn merge(
    challenger: &Population,
    challenger_fitness: &[f64],
    incumbent: &mut Population,
    incumbent_fitness: &mut [f64],
    policy: MergePolicy,
) -> usize {
    let mut replaced = 0;
    for i in 0..incumbent.size() {
        if challenger_fitness[i] < incumbent_fitness[i] {
            incumbent.copy_slot_from(challenger, i, i);
            if policy == MergePolicy::CarryFitness {
                incumbent_fitness[i] = challenger_fitness[i];
            }
            replaced += 1;
        }
    }
    replaced
}

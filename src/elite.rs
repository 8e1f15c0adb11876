//! Best-solution tracking: personal bests, the global best and the elite
//! memory archive.

use serde::{Deserialize, Serialize};

use crate::population::{index_of_max, index_of_min, Population};

/// Best position found by any particle so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalBest {
    /// Best position
    pub position: Vec<f64>,
    /// Its fitness
    pub fitness: f64,
}

impl GlobalBest {
    /// Placeholder before the first evaluation.
    #[must_use]
    pub fn unset(dims: usize) -> Self {
        Self {
            position: vec![0.0; dims],
            fitness: f64::INFINITY,
        }
    }

    /// Seed from the best particle of an evaluated population.
    ///
    /// An all-`NaN` population leaves the fitness at `+inf` so any later
    /// comparable value is promoted.
    #[must_use]
    pub fn from_population(pop: &Population, fitness: &[f64]) -> Self {
        let best = index_of_min(fitness);
        Self {
            position: pop.position(best).to_vec(),
            fitness: unreached_if_nan(fitness[best]),
        }
    }
}

/// Bounded archive of historical global bests.
///
/// Slots fill in order; once full, a strictly better newcomer evicts the
/// worst member.
/// Membership is independent of particle-slot identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliteArchive {
    members: Population,
    fitness: Vec<f64>,
    len: usize,
}

impl EliteArchive {
    /// Empty archive for `capacity` members of dimension `dims`.
    #[must_use]
    pub fn new(capacity: usize, dims: usize) -> Self {
        Self {
            members: Population::zeros(capacity, dims),
            fitness: vec![f64::INFINITY; capacity],
            len: 0,
        }
    }

    /// Maximum number of members.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.members.size()
    }

    /// Current number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the archive holds no member yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of member `i`.
    #[must_use]
    pub fn position(&self, i: usize) -> &[f64] {
        self.members.position(i)
    }

    /// Fitness values of the filled slots.
    #[must_use]
    pub fn fitness(&self) -> &[f64] {
        &self.fitness[..self.len]
    }

    /// Insert slot `src` of `pop` with fitness `fitness`.
    ///
    /// A full archive evicts its worst member, but only for a strictly
    /// better newcomer. Returns the archive slot written, or `None` when the
    /// archive has zero capacity or the newcomer was rejected.
    pub fn insert(&mut self, pop: &Population, src: usize, fitness: f64) -> Option<usize> {
        if self.capacity() == 0 {
            return None;
        }

        let dst = if self.len == self.capacity() {
            let worst = index_of_max(&self.fitness);
            let stored = self.fitness[worst];
            let better = fitness < stored || (stored.is_nan() && !fitness.is_nan());
            if !better {
                return None;
            }
            worst
        } else {
            self.len += 1;
            self.len - 1
        };

        self.members.copy_slot_from(pop, src, dst);
        self.fitness[dst] = fitness;
        Some(dst)
    }
}

/// Overwrite personal bests that `pop` strictly improves on.
///
/// Returns the number of slots updated.
pub fn update_personal_best(
    pop: &Population,
    fitness: &[f64],
    best: &mut Population,
    best_fitness: &mut [f64],
) -> usize {
    let mut updated = 0;
    for i in 0..pop.size() {
        if fitness[i] < best_fitness[i] {
            best.copy_slot_from(pop, i, i);
            best_fitness[i] = fitness[i];
            updated += 1;
        }
    }
    updated
}

/// `+inf` for `NaN`, otherwise `value`.
#[must_use]
pub fn unreached_if_nan(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

/// Promote the population's best particle if it beats the global best.
///
/// A promoted particle is also copied into the archive. Returns whether the
/// global best changed.
pub fn update_global_best(
    pop: &Population,
    fitness: &[f64],
    global: &mut GlobalBest,
    archive: &mut EliteArchive,
) -> bool {
    let src = index_of_min(fitness);
    if fitness[src] < global.fitness {
        global.position.copy_from_slice(pop.position(src));
        global.fitness = fitness[src];
        archive.insert(pop, src, fitness[src]);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(values: &[f64]) -> Population {
        let mut pop = Population::zeros(values.len(), 1);
        for (i, &v) in values.iter().enumerate() {
            pop.position_mut(i)[0] = v;
        }
        pop
    }

    #[test]
    fn test_archive_fills_in_order() {
        let pop = line(&[1.0, 2.0, 3.0]);
        let mut archive = EliteArchive::new(2, 1);
        assert!(archive.is_empty());

        assert_eq!(archive.insert(&pop, 0, 5.0), Some(0));
        assert_eq!(archive.insert(&pop, 1, 4.0), Some(1));
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.fitness(), &[5.0, 4.0]);
    }

    #[test]
    fn test_archive_evicts_worst_when_full() {
        let pop = line(&[1.0, 2.0, 3.0]);
        let mut archive = EliteArchive::new(2, 1);
        archive.insert(&pop, 0, 5.0);
        archive.insert(&pop, 1, 4.0);

        assert_eq!(archive.insert(&pop, 2, 3.0), Some(0));
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.fitness(), &[3.0, 4.0]);
        assert_eq!(archive.position(0), &[3.0]);
    }

    #[test]
    fn test_full_archive_rejects_no_better_newcomer() {
        let pop = line(&[1.0, 2.0, 3.0]);
        let mut archive = EliteArchive::new(2, 1);
        archive.insert(&pop, 0, 1.0);
        archive.insert(&pop, 1, 2.0);

        assert_eq!(archive.insert(&pop, 2, 5.0), None);
        assert_eq!(archive.insert(&pop, 2, 2.0), None);
        assert_eq!(archive.insert(&pop, 2, f64::NAN), None);
        assert_eq!(archive.fitness(), &[1.0, 2.0]);
        assert_eq!(archive.position(1), &[2.0]);
    }

    #[test]
    fn test_global_best_from_undefined_population() {
        let pop = line(&[1.0, 2.0]);
        let mut global = GlobalBest::from_population(&pop, &[f64::NAN, f64::NAN]);
        assert_eq!(global.fitness, f64::INFINITY);

        let mut archive = EliteArchive::new(1, 1);
        assert!(update_global_best(&pop, &[f64::NAN, 4.0], &mut global, &mut archive));
        assert_eq!(global.fitness, 4.0);
        assert_eq!(global.position, vec![2.0]);
    }

    #[test]
    fn test_zero_capacity_archive() {
        let pop = line(&[1.0]);
        let mut archive = EliteArchive::new(0, 1);
        assert_eq!(archive.insert(&pop, 0, 1.0), None);
        assert!(archive.is_empty());
    }

    #[test]
    fn test_personal_best_strict_improvement() {
        let pop = line(&[10.0, 20.0, 30.0]);
        let mut best = line(&[0.0, 0.0, 0.0]);
        let mut best_fitness = vec![5.0, 5.0, 5.0];

        let updated = update_personal_best(&pop, &[4.0, 5.0, 6.0], &mut best, &mut best_fitness);

        assert_eq!(updated, 1);
        assert_eq!(best_fitness, vec![4.0, 5.0, 5.0]);
        assert_eq!(best.position(0), &[10.0]);
        assert_eq!(best.position(1), &[0.0]);
    }

    #[test]
    fn test_personal_best_ignores_nan() {
        let pop = line(&[1.0]);
        let mut best = line(&[0.0]);
        let mut best_fitness = vec![1.0];
        assert_eq!(
            update_personal_best(&pop, &[f64::NAN], &mut best, &mut best_fitness),
            0
        );
    }

    #[test]
    fn test_global_best_promotes_and_archives() {
        let pop = line(&[1.0, 2.0, 3.0]);
        let mut global = GlobalBest::from_population(&pop, &[3.0, 2.0, 1.0]);
        assert_eq!(global.position, vec![3.0]);
        let mut archive = EliteArchive::new(3, 1);

        let moved = line(&[7.0, 8.0, 9.0]);
        assert!(update_global_best(&moved, &[2.0, 0.5, 4.0], &mut global, &mut archive));
        assert_eq!(global.position, vec![8.0]);
        assert!((global.fitness - 0.5).abs() < f64::EPSILON);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.position(0), &[8.0]);

        assert!(!update_global_best(&moved, &[0.5, 0.6, 0.7], &mut global, &mut archive));
        assert_eq!(archive.len(), 1);
    }
}

//! Differential recombination over better-than-self donors.
//!
//! For each particle the donor pool holds the archive members and/or
//! population members with strictly lower fitness. RAND builds
//! `a + F·(b - c)` and crosses toward the personal best; BEST builds
//! `g_best + F·(a - b)` and crosses toward the global best. `F` and the
//! crossover rate come from the particle's own weight. When the pool is too
//! small the particle is copied verbatim and left unflagged.

use crate::config::{CandidateSource, DeStrategy};
use crate::elite::EliteArchive;
use crate::population::Population;
use crate::random::RandomStream;

/// A donor reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Slot of the elite archive
    Archive(usize),
    /// Slot of the incumbent population
    Population(usize),
}

/// Read-only inputs of a recombination pass.
#[derive(Debug, Clone, Copy)]
pub struct RecombinationContext<'a> {
    /// Population donors are drawn from
    pub incumbent: &'a Population,
    /// Fitness of `incumbent`
    pub fitness: &'a [f64],
    /// Personal bests (RAND crossover target)
    pub personal_best: &'a Population,
    /// Global best position (BEST base vector and crossover target)
    pub global_best: &'a [f64],
    /// Elite memory archive
    pub archive: &'a EliteArchive,
    /// Which pools to scan
    pub source: CandidateSource,
}

impl<'a> RecombinationContext<'a> {
    fn resolve(&self, candidate: Candidate) -> &'a [f64] {
        match candidate {
            Candidate::Archive(i) => self.archive.position(i),
            Candidate::Population(i) => self.incumbent.position(i),
        }
    }
}

/// Rebuild `out` with every donor strictly better than particle `k`.
///
/// Archive members come first, then population members, each in slot order.
pub fn collect_candidates(ctx: &RecombinationContext<'_>, k: usize, out: &mut Vec<Candidate>) {
    let own = ctx.fitness[k];
    out.clear();

    if ctx.source.uses_archive() {
        out.extend(
            ctx.archive
                .fitness()
                .iter()
                .enumerate()
                .filter(|(_, &f)| f < own)
                .map(|(i, _)| Candidate::Archive(i)),
        );
    }

    if ctx.source.uses_population() {
        out.extend(
            ctx.fitness
                .iter()
                .enumerate()
                .filter(|(_, &f)| f < own)
                .map(|(i, _)| Candidate::Population(i)),
        );
    }
}

/// Write one recombined child per particle into `challenger`.
///
/// Sets `refresh[i]` only for particles that were actually recombined.
/// Returns how many were. Bounds are not enforced here.
pub fn recombine(
    strategy: DeStrategy,
    ctx: &RecombinationContext<'_>,
    challenger: &mut Population,
    refresh: &mut [bool],
    candidates: &mut Vec<Candidate>,
    rng: &mut impl RandomStream,
) -> usize {
    let dims = ctx.incumbent.dims();
    let mut recombined = 0;

    for i in 0..ctx.incumbent.size() {
        collect_candidates(ctx, i, candidates);

        if candidates.len() < strategy.required_candidates() {
            challenger.copy_slot_from(ctx.incumbent, i, i);
            continue;
        }

        rng.shuffle(candidates);

        let w = *ctx.incumbent.weight(i);
        let (base, donor_a, donor_b, target) = match strategy {
            DeStrategy::Rand => (
                ctx.resolve(candidates[0]),
                ctx.resolve(candidates[1]),
                ctx.resolve(candidates[2]),
                ctx.personal_best.position(i),
            ),
            DeStrategy::Best => (
                ctx.global_best,
                ctx.resolve(candidates[0]),
                ctx.resolve(candidates[1]),
                ctx.global_best,
            ),
        };

        let child = challenger.position_mut(i);
        for j in 0..dims {
            child[j] = base[j] + w.d_velocity * (donor_a[j] - donor_b[j]);
        }

        let forced = rng.index(dims);
        for j in 0..dims {
            if rng.coin(w.d_threshold) || j == forced {
                child[j] = target[j];
            }
        }

        challenger
            .velocity_mut(i)
            .copy_from_slice(ctx.incumbent.velocity(i));
        *challenger.weight_mut(i) = w;
        refresh[i] = true;
        recombined += 1;
    }

    recombined
}

#[cfg(test)]
#[path = "recombination_tests.rs"]
mod tests;

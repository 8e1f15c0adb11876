//! Random stream contract used by every stochastic operator.
//!
//! Operators only rely on the statistical contract below, so tests can swap in
//! scripted streams while production runs use [`SeededStream`].

use rand::prelude::*;
use rand_distr::StandardNormal;

/// Source of the random draws the optimizer needs.
pub trait RandomStream {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Standard normal draw `N(0, 1)`.
    fn normal(&mut self) -> f64;

    /// Bernoulli draw succeeding with probability `p`.
    ///
    /// Values of `p` outside `[0, 1]` saturate; `NaN` never succeeds.
    fn coin(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Uniform integer in `0..n`. `n` must be non-zero.
    fn index(&mut self, n: usize) -> usize;

    /// In-place uniform shuffle.
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Production stream backed by [`StdRng`].
///
/// # Example
///
/// ```
/// use cdeepso::random::{RandomStream, SeededStream};
///
/// let mut a = SeededStream::seeded(7);
/// let mut b = SeededStream::seeded(7);
/// assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
/// ```
#[derive(Debug, Clone)]
pub struct SeededStream {
    rng: StdRng,
}

impl SeededStream {
    /// Deterministic stream for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stream seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, otherwise from entropy.
    #[must_use]
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomStream for SeededStream {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    fn index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_in_unit_interval() {
        let mut rng = SeededStream::seeded(42);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_coin_extremes() {
        let mut rng = SeededStream::seeded(1);
        for _ in 0..200 {
            assert!(!rng.coin(0.0));
            assert!(rng.coin(1.0));
            assert!(!rng.coin(f64::NAN));
        }
    }

    #[test]
    fn test_coin_frequency() {
        let mut rng = SeededStream::seeded(3);
        let hits = (0..10_000).filter(|_| rng.coin(0.25)).count();
        assert!((2_200..2_800).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = SeededStream::seeded(11);
        let draws: Vec<f64> = (0..20_000).map(|_| rng.normal()).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.05, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.05, "var = {var}");
    }

    #[test]
    fn test_index_range() {
        let mut rng = SeededStream::seeded(5);
        for _ in 0..500 {
            assert!(rng.index(3) < 3);
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SeededStream::seeded(9);
        let mut items: Vec<usize> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededStream::seeded(2024);
        let mut b = SeededStream::seeded(2024);
        for _ in 0..100 {
            assert_eq!(a.normal().to_bits(), b.normal().to_bits());
            assert_eq!(a.index(17), b.index(17));
        }
    }
}

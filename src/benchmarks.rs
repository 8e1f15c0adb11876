//! Standard test objectives for benchmarking the optimizer.
//!
//! All functions are minimized; each has a global minimum of 0.

use std::f64::consts::{E, PI};

/// Sphere: `Σ xᵢ²`. Minimum at the origin.
///
/// # Example
/// ```
/// use cdeepso::benchmarks::sphere;
/// assert!((sphere(&[1.0, 2.0]) - 5.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

/// Rastrigin: `10·n + Σ (xᵢ² - 10·cos(2π·xᵢ))`.
///
/// Highly multimodal, regular lattice of local minima. Minimum at the origin.
#[must_use]
pub fn rastrigin(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Rosenbrock: `Σ 100·(xᵢ₊₁ - xᵢ²)² + (1 - xᵢ)²`.
///
/// Narrow curved valley. Minimum at `(1, …, 1)`.
#[must_use]
pub fn rosenbrock(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| {
            let valley = w[1] - w[0] * w[0];
            let slope = 1.0 - w[0];
            100.0 * valley * valley + slope * slope
        })
        .sum()
}

/// Griewank: `1 + Σ xᵢ²/4000 - Π cos(xᵢ/√(i+1))`. Minimum at the origin.
#[must_use]
pub fn griewank(x: &[f64]) -> f64 {
    let (sum, prod) = x
        .iter()
        .enumerate()
        .fold((0.0, 1.0), |(sum, prod), (i, xi)| {
            (sum + xi * xi, prod * (xi / ((i + 1) as f64).sqrt()).cos())
        });
    1.0 + sum / 4000.0 - prod
}

/// Ackley. Nearly flat outer region with a deep hole at the origin.
#[must_use]
pub fn ackley(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|xi| (2.0 * PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

#[cfg(test)]
#[path = "benchmarks_tests.rs"]
mod tests;

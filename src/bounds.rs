//! Position and velocity limits.

use serde::{Deserialize, Serialize};

use crate::population::Population;

/// Per-dimension position and velocity clamps.
///
/// Velocity limits are symmetric around zero: `v_min = x_min - x_max`,
/// `v_max = -v_min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower position bound per dimension
    pub x_min: Vec<f64>,
    /// Upper position bound per dimension
    pub x_max: Vec<f64>,
    /// Lower velocity bound per dimension
    pub v_min: Vec<f64>,
    /// Upper velocity bound per dimension
    pub v_max: Vec<f64>,
}

impl Bounds {
    /// Broadcast scalar position limits to every dimension.
    ///
    /// # Example
    ///
    /// ```
    /// use cdeepso::bounds::Bounds;
    ///
    /// let b = Bounds::uniform(2, -1.0, 3.0);
    /// assert_eq!(b.v_min, vec![-4.0, -4.0]);
    /// assert_eq!(b.v_max, vec![4.0, 4.0]);
    /// ```
    #[must_use]
    pub fn uniform(dims: usize, min: f64, max: f64) -> Self {
        let v_min = min - max;
        Self {
            x_min: vec![min; dims],
            x_max: vec![max; dims],
            v_min: vec![v_min; dims],
            v_max: vec![-v_min; dims],
        }
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.x_min.len()
    }

    /// Clamp velocity component `j` into `[v_min, v_max]`.
    #[must_use]
    pub fn clamp_velocity(&self, j: usize, v: f64) -> f64 {
        if v > self.v_max[j] {
            self.v_max[j]
        } else if v < self.v_min[j] {
            self.v_min[j]
        } else {
            v
        }
    }

    /// Bounce one particle off the walls.
    ///
    /// A clamped position reverses a velocity that still points outward; the
    /// velocity is then clamped independently.
    pub fn enforce_particle(&self, position: &mut [f64], velocity: &mut [f64]) {
        for (j, (x, v)) in position.iter_mut().zip(velocity.iter_mut()).enumerate() {
            if *x < self.x_min[j] {
                *x = self.x_min[j];
                if *v < 0.0 {
                    *v = -*v;
                }
            } else if *x > self.x_max[j] {
                *x = self.x_max[j];
                if *v > 0.0 {
                    *v = -*v;
                }
            }

            *v = self.clamp_velocity(j, *v);
        }
    }

    /// Apply [`Bounds::enforce_particle`] to every particle.
    pub fn enforce(&self, pop: &mut Population) {
        for i in 0..pop.size() {
            let (position, velocity) = pop.state_mut(i);
            self.enforce_particle(position, velocity);
        }
    }

    /// Whether a position lies inside the box.
    #[must_use]
    pub fn contains(&self, position: &[f64]) -> bool {
        position
            .iter()
            .enumerate()
            .all(|(j, x)| (self.x_min[j]..=self.x_max[j]).contains(x))
    }
}

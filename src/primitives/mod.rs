//! Core numeric primitives.
//!
//! A single dense [`Matrix`] backs every population: one row per particle.

mod matrix;

pub use matrix::Matrix;

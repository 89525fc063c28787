//! Distance matrices.
//!
//! Provides the validated dense travel-cost table every tour is scored
//! against.

mod matrix;

pub use matrix::{DistanceMatrix, MIN_LOCATIONS};

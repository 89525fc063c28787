//! Random sampling for tour search.
//!
//! - [`random_permutation`] — Uniform random initial tour (Fisher-Yates)
//! - [`random_cut_points`] — Uniform valid 2-opt cut pair (bounded rejection sampling)

mod cut_points;
mod permutation;

pub use cut_points::{random_cut_points, CutPoints, MAX_CUT_ATTEMPTS};
pub use permutation::{random_permutation, shuffle};

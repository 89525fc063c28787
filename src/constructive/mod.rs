//! Constructive heuristics for initial tours.
//!
//! - [`seed_route`] — Uniformly random tour over all locations, O(n)

mod random_tour;

pub use random_tour::seed_route;

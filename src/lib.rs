//! # u-evoroute
//!
//! Route mutation and evaluation engine for a distributed evolutionary search
//! over traveling-salesman tours: seeds runs with random tours, derives
//! children by 2-opt point mutation, scores them, and ranks the ones worth
//! persisting.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Tour, GenerationKey, RouteRecord, RankedSummary, DistanceData)
//! - [`distance`] — Validated distance matrix
//! - [`sampling`] — Uniform permutations and 2-opt cut points
//! - [`evaluation`] — Closed-cycle tour length
//! - [`mutation`] — 2-opt child generation
//! - [`constructive`] — Random initial tours
//! - [`batch`] — Generate, filter, persist and rank a batch of children
//! - [`store`] — Persistence and ID collaborators, in-memory store
//! - [`service`] — Caller-facing operations over a store
//! - [`config`] — Engine configuration
//! - [`error`] — Error types

pub mod batch;
pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod mutation;
pub mod sampling;
pub mod service;
pub mod store;

pub use error::{EvolveError, Result};

//! Domain model types for evolutionary tour search.
//!
//! Provides tours, run-and-generation keys, the scored route records handed
//! to the store, their ranked public projections, and a region's distance
//! data.

mod city;
mod generation;
mod record;
mod tour;

pub use city::{City, DistanceData};
pub use generation::{next_generation, GenerationKey, SEPARATOR};
pub use record::{RankedSummary, RouteRecord, RouteSummary};
pub use tour::Tour;

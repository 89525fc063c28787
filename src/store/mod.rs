//! Collaborator interfaces around the persistence store.
//!
//! The engine reads distance data and parent routes, blind-writes new
//! records, and asks for fresh IDs. It never updates a stored record.
//!
//! - [`DistanceSource`] — Region distance data lookup
//! - [`RouteSource`] — Route lookup by ID and best routes of a generation
//! - [`RouteSink`] — Bounded atomic batch writes
//! - [`IdSource`] — Collision-resistant unique route IDs
//!
//! [`InMemoryStore`] implements the three store traits; [`RandomIdSource`]
//! implements [`IdSource`].

mod id;
mod memory;

pub use id::RandomIdSource;
pub use memory::InMemoryStore;

use crate::error::Result;
use crate::models::{DistanceData, GenerationKey, RouteRecord, RouteSummary};

/// Supplies the cities and distance matrix of a region.
pub trait DistanceSource: Send + Sync {
    /// Fetches the distance data of `region`.
    ///
    /// Fails with [`EvolveError::DataUnavailable`](crate::error::EvolveError::DataUnavailable)
    /// if the region is unknown.
    fn fetch_distance_data(&self, region: &str) -> Result<DistanceData>;
}

/// Reads stored routes.
pub trait RouteSource: Send + Sync {
    /// Fetches the full record of a route.
    ///
    /// Fails with [`EvolveError::NotFound`](crate::error::EvolveError::NotFound)
    /// if absent.
    fn fetch_route(&self, route_id: &str) -> Result<RouteRecord>;

    /// Returns up to `limit` routes of one run and generation, shortest
    /// first.
    fn best_routes(&self, key: &GenerationKey, limit: usize) -> Result<Vec<RouteSummary>>;
}

/// Outcome of a batch write.
///
/// A partial failure is reported, not raised: callers log it and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Every record was stored.
    Success,
    /// Some records were not stored.
    PartialFailure {
        /// Records stored.
        written: usize,
        /// Records left unprocessed.
        unprocessed: usize,
    },
}

impl WriteOutcome {
    /// Returns `true` if every record was stored.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Blind-writes new route records.
pub trait RouteSink: Send + Sync {
    /// Largest number of records one [`write_routes`](Self::write_routes)
    /// call accepts.
    fn max_batch_size(&self) -> usize;

    /// Stores `records` as one atomic best-effort batch.
    fn write_routes(&self, records: &[RouteRecord]) -> WriteOutcome;
}

/// Produces unique route IDs.
pub trait IdSource: Send + Sync {
    /// Returns a new ID, unique with overwhelming probability.
    fn new_id(&self) -> String;
}

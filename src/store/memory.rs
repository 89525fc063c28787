//! In-memory store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use super::{DistanceSource, RouteSink, RouteSource, WriteOutcome};
use crate::config::DEFAULT_MAX_BATCH_SIZE;
use crate::error::{EvolveError, Result};
use crate::models::{DistanceData, GenerationKey, RouteRecord, RouteSummary};

/// A process-local store implementing every store collaborator trait.
///
/// Batches larger than the configured limit are refused as a whole and
/// reported with every record unprocessed. Writes can be switched off to
/// exercise the partial-failure path.
///
/// # Examples
///
/// ```
/// use u_evoroute::store::{InMemoryStore, RouteSink};
///
/// let store = InMemoryStore::new().with_max_batch_size(10);
/// assert_eq!(store.max_batch_size(), 10);
/// assert!(store.write_routes(&[]).is_success());
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    regions: RwLock<HashMap<String, DistanceData>>,
    routes: RwLock<HashMap<String, RouteRecord>>,
    max_batch_size: usize,
    writes_fail: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store with the default batch limit of 25.
    pub fn new() -> Self {
        Self {
            regions: RwLock::new(HashMap::new()),
            routes: RwLock::new(HashMap::new()),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            writes_fail: AtomicBool::new(false),
        }
    }

    /// Sets the batch limit.
    pub fn with_max_batch_size(mut self, n: usize) -> Self {
        self.max_batch_size = n;
        self
    }

    /// Stores the distance data of a region, replacing any previous data.
    pub fn insert_region(&self, region: impl Into<String>, data: DistanceData) {
        self.regions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(region.into(), data);
    }

    /// Stores a route directly, bypassing batch limits.
    pub fn insert_route(&self, record: RouteRecord) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.route_id.clone(), record);
    }

    /// When `true`, every subsequent write stores nothing.
    pub fn set_writes_fail(&self, fail: bool) {
        self.writes_fail.store(fail, Ordering::Relaxed);
    }

    /// Number of stored routes.
    pub fn route_count(&self) -> usize {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceSource for InMemoryStore {
    fn fetch_distance_data(&self, region: &str) -> Result<DistanceData> {
        self.regions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(region)
            .cloned()
            .ok_or_else(|| EvolveError::DataUnavailable {
                region: region.to_string(),
            })
    }
}

impl RouteSource for InMemoryStore {
    fn fetch_route(&self, route_id: &str) -> Result<RouteRecord> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(route_id)
            .cloned()
            .ok_or_else(|| EvolveError::NotFound {
                route_id: route_id.to_string(),
            })
    }

    fn best_routes(&self, key: &GenerationKey, limit: usize) -> Result<Vec<RouteSummary>> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching: Vec<RouteSummary> = routes
            .values()
            .filter(|r| &r.generation_key == key)
            .map(RouteRecord::summary)
            .collect();
        // HashMap order is arbitrary; break length ties by ID for a stable answer.
        matching.sort_by(|a, b| {
            a.length
                .total_cmp(&b.length)
                .then_with(|| a.route_id.cmp(&b.route_id))
        });
        matching.truncate(limit);
        Ok(matching)
    }
}

impl RouteSink for InMemoryStore {
    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    fn write_routes(&self, records: &[RouteRecord]) -> WriteOutcome {
        if records.len() > self.max_batch_size {
            warn!(
                batch = records.len(),
                limit = self.max_batch_size,
                "refusing oversized batch"
            );
            return WriteOutcome::PartialFailure {
                written: 0,
                unprocessed: records.len(),
            };
        }
        if self.writes_fail.load(Ordering::Relaxed) {
            return WriteOutcome::PartialFailure {
                written: 0,
                unprocessed: records.len(),
            };
        }

        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        for record in records {
            routes.insert(record.route_id.clone(), record.clone());
        }
        debug!(written = records.len(), "stored route batch");
        WriteOutcome::Success
    }
}

//! Caller-facing operations.
//!
//! [`RouteService`] ties the engine to its store collaborators and exposes the
//! five calls a response layer maps to requests:
//!
//! | Call | Result |
//! |---|---|
//! | [`cities`](RouteService::cities) | cities of the configured region |
//! | [`seed`](RouteService::seed) | `{routeId, length}` of a new random route |
//! | [`mutate`](RouteService::mutate) | ranked `{routeId, length}` of new children |
//! | [`route`](RouteService::route) | full stored record |
//! | [`best_routes`](RouteService::best_routes) | shortest `{routeId, length}` of a generation |
//!
//! Every call is independent. Apart from its configuration and collaborators
//! the service only keeps a call counter, which picks the random stream of a
//! seeded configuration.

use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::batch::{ChildBatchProcessor, LengthThreshold};
use crate::config::EngineConfig;
use crate::constructive::seed_route;
use crate::error::{EvolveError, Result};
use crate::models::{City, GenerationKey, RankedSummary, RouteRecord, RouteSummary};
use crate::store::{DistanceSource, IdSource, RandomIdSource, RouteSink, RouteSource};

/// Body of a seeding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRequest {
    pub run_id: String,
    pub generation: u64,
}

/// Body of a mutation call.
///
/// ```
/// use u_evoroute::batch::LengthThreshold;
/// use u_evoroute::service::MutationRequest;
///
/// let req: MutationRequest =
///     serde_json::from_str(r#"{"routeId": "abc", "numChildren": 5}"#).unwrap();
/// assert_eq!(req.num_children, 5);
/// assert_eq!(req.length_store_threshold, LengthThreshold::Unbounded);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRequest {
    /// Parent route to mutate.
    pub route_id: String,
    /// Number of children to generate.
    pub num_children: usize,
    /// Only children shorter than this are persisted and returned.
    #[serde(default)]
    pub length_store_threshold: LengthThreshold,
}

/// The engine bound to a store.
///
/// # Examples
///
/// ```
/// use u_evoroute::config::EngineConfig;
/// use u_evoroute::models::DistanceData;
/// use u_evoroute::service::{MutationRequest, RouteService};
/// use u_evoroute::store::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// store.insert_region("Minnesota", DistanceData::from_json_str(r#"{
///     "cities": [{"index": 0}, {"index": 1}, {"index": 2}, {"index": 3}],
///     "distances": [[0,1,2,3],[1,0,4,5],[2,4,0,6],[3,5,6,0]]
/// }"#).unwrap());
///
/// let service = RouteService::new(store, EngineConfig::default().with_seed(1)).unwrap();
/// let seed = service.seed("run", 0).unwrap();
///
/// let ranked = service.mutate(&MutationRequest {
///     route_id: seed.route_id,
///     num_children: 4,
///     length_store_threshold: Default::default(),
/// }).unwrap();
/// assert_eq!(ranked.len(), 4);
/// assert_eq!(service.best_routes("run", 1, 10).unwrap().len(), 4);
/// ```
pub struct RouteService<S> {
    store: S,
    ids: Box<dyn IdSource>,
    config: EngineConfig,
    calls: AtomicU64,
}

impl<S> RouteService<S>
where
    S: DistanceSource + RouteSource + RouteSink,
{
    /// Creates a service over `store`, naming routes with [`RandomIdSource`].
    ///
    /// # Errors
    ///
    /// [`EvolveError::Config`] if `config` fails validation.
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            ids: Box::new(RandomIdSource),
            config,
            calls: AtomicU64::new(0),
        })
    }

    /// Replaces the ID source.
    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Batch limit in force: the configured limit capped by the store's.
    pub fn batch_limit(&self) -> usize {
        self.config.max_batch_size.min(self.store.max_batch_size())
    }

    /// Lists the cities of the configured region.
    pub fn cities(&self) -> Result<Vec<City>> {
        let data = self.store.fetch_distance_data(&self.config.region)?;
        Ok(data.cities().to_vec())
    }

    /// Creates and stores a random route for `run_id` at `generation`.
    ///
    /// # Errors
    ///
    /// Collaborator errors propagate unchanged. Unlike a mutation batch, a
    /// failed write fails the call with [`EvolveError::Persistence`].
    pub fn seed(&self, run_id: &str, generation: u64) -> Result<RouteSummary> {
        let generation_key = GenerationKey::new(run_id, generation)?;
        let data = self.store.fetch_distance_data(&self.config.region)?;

        let mut rng = self.call_rng();
        let record = seed_route(data.distances(), generation_key, &*self.ids, &mut rng);

        if !self.store.write_routes(slice::from_ref(&record)).is_success() {
            warn!(route = %record.route_id, "seed route was not persisted");
            return Err(EvolveError::Persistence {
                route_id: record.route_id,
            });
        }
        Ok(record.summary())
    }

    /// [`seed`](Self::seed) taking its arguments as a request body.
    pub fn seed_request(&self, request: &SeedRequest) -> Result<RouteSummary> {
        self.seed(&request.run_id, request.generation)
    }

    /// Generates children of a stored route and returns those kept, ranked.
    ///
    /// The batch limit is checked before anything is fetched. Persisting the
    /// children is best-effort; see
    /// [`ChildBatchProcessor::produce_batch`].
    pub fn mutate(&self, request: &MutationRequest) -> Result<RankedSummary> {
        let limit = self.batch_limit();
        if request.num_children > limit {
            return Err(EvolveError::BatchTooLarge {
                requested: request.num_children,
                limit,
            });
        }

        let data = self.store.fetch_distance_data(&self.config.region)?;
        let parent = self.store.fetch_route(&request.route_id)?;
        debug!(
            parent = %parent.route_id,
            generation = %parent.generation_key,
            children = request.num_children,
            "mutating route"
        );

        let processor = ChildBatchProcessor::new(data.distances(), &*self.ids, &self.store)
            .with_max_batch_size(self.config.max_batch_size)
            .with_parallel(self.config.parallel);
        let mut rng = self.call_rng();
        processor.produce_batch(
            &parent,
            request.num_children,
            request.length_store_threshold,
            &mut rng,
        )
    }

    /// Fetches the full record of a route.
    pub fn route(&self, route_id: &str) -> Result<RouteRecord> {
        self.store.fetch_route(route_id)
    }

    /// Returns up to `limit` of the shortest routes of `run_id` at
    /// `generation`.
    pub fn best_routes(
        &self,
        run_id: &str,
        generation: u64,
        limit: usize,
    ) -> Result<Vec<RouteSummary>> {
        let key = GenerationKey::new(run_id, generation)?;
        self.store.best_routes(&key, limit)
    }

    /// A seeded configuration gives call `k` stream `k` of the seeded key, so
    /// a fresh service replays the same sequence of calls.
    fn call_rng(&self) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(self.calls.fetch_add(1, Ordering::Relaxed));
                rng
            }
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        }
    }
}

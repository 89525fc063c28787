//! Batch production of ranked children.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, warn};

use super::LengthThreshold;
use crate::distance::DistanceMatrix;
use crate::error::{EvolveError, Result};
use crate::models::{GenerationKey, RankedSummary, RouteRecord};
use crate::mutation::TwoOptMutator;
use crate::store::{IdSource, RouteSink, WriteOutcome};

/// Produces a batch of children from one parent, persists the short ones and
/// ranks them.
///
/// The batch limit is the sink's [`max_batch_size`](RouteSink::max_batch_size),
/// optionally lowered with [`with_max_batch_size`](Self::with_max_batch_size).
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use u_evoroute::batch::{ChildBatchProcessor, LengthThreshold};
/// use u_evoroute::distance::DistanceMatrix;
/// use u_evoroute::models::{GenerationKey, RouteRecord, Tour};
/// use u_evoroute::store::{InMemoryStore, RandomIdSource};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 4.0, 5.0],
///     vec![2.0, 4.0, 0.0, 6.0],
///     vec![3.0, 5.0, 6.0, 0.0],
/// ]).unwrap();
/// let parent = RouteRecord {
///     route_id: "p".into(),
///     generation_key: GenerationKey::new("run", 0).unwrap(),
///     tour: Tour::new(vec![0, 1, 2, 3]),
///     length: 14.0,
/// };
/// let store = InMemoryStore::new();
/// let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let ranked = processor
///     .produce_batch(&parent, 3, LengthThreshold::Unbounded, &mut rng)
///     .unwrap();
/// assert_eq!(ranked.len(), 3);
/// assert_eq!(store.route_count(), 3);
/// ```
pub struct ChildBatchProcessor<'a> {
    distances: &'a DistanceMatrix,
    ids: &'a dyn IdSource,
    sink: &'a dyn RouteSink,
    max_batch_size: usize,
    parallel: bool,
}

impl<'a> ChildBatchProcessor<'a> {
    /// Creates a processor writing to `sink`.
    pub fn new(
        distances: &'a DistanceMatrix,
        ids: &'a dyn IdSource,
        sink: &'a dyn RouteSink,
    ) -> Self {
        Self {
            distances,
            ids,
            sink,
            max_batch_size: sink.max_batch_size(),
            parallel: true,
        }
    }

    /// Lowers the batch limit. The sink's own limit still caps it.
    pub fn with_max_batch_size(mut self, n: usize) -> Self {
        self.max_batch_size = n.min(self.sink.max_batch_size());
        self
    }

    /// Enables or disables rayon for child generation. Without the
    /// `parallel` feature children are always generated serially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Largest `count` accepted by [`produce_batch`](Self::produce_batch).
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Generates `count` children of `parent`, writes those admitted by
    /// `threshold` as one batch and returns them ranked by length.
    ///
    /// Each child draws from its own [`ChaCha8Rng`] seeded from `rng`, so
    /// the result depends only on `rng`, not on whether children were
    /// computed in parallel. A failed or partial write is logged and does not
    /// affect the returned ranking; nothing is written when no child is
    /// admitted.
    ///
    /// # Errors
    ///
    /// - [`EvolveError::BatchTooLarge`] if `count` exceeds the batch limit
    /// - [`EvolveError::MalformedTour`] if the parent tour doesn't cover the
    ///   matrix
    /// - [`EvolveError::MalformedGenerationKey`] if the next generation
    ///   number overflows
    /// - [`EvolveError::SamplingExhausted`] from cut-point sampling
    ///
    /// All but the last are raised before any child is generated.
    pub fn produce_batch<R: Rng>(
        &self,
        parent: &RouteRecord,
        count: usize,
        threshold: LengthThreshold,
        rng: &mut R,
    ) -> Result<RankedSummary> {
        if count > self.max_batch_size {
            return Err(EvolveError::BatchTooLarge {
                requested: count,
                limit: self.max_batch_size,
            });
        }
        parent.tour.validate(self.distances.size())?;
        let generation_key = parent.generation_key.next()?;

        let seeds: Vec<u64> = (0..count).map(|_| rng.random()).collect();
        let children = self.spawn(parent, &generation_key, &seeds)?;

        let generated = children.len();
        let retained: Vec<RouteRecord> = children
            .into_iter()
            .filter(|child| threshold.admits(child.length))
            .collect();

        if !retained.is_empty() {
            if let WriteOutcome::PartialFailure {
                written,
                unprocessed,
            } = self.sink.write_routes(&retained)
            {
                warn!(
                    parent = %parent.route_id,
                    written,
                    unprocessed,
                    "child batch only partially persisted"
                );
            }
        }

        let ranked = RankedSummary::from_records(&retained);
        info!(
            parent = %parent.route_id,
            generation = %generation_key,
            generated,
            retained = ranked.len(),
            best = ranked.best().map(|e| e.length),
            "produced child batch"
        );
        Ok(ranked)
    }

    fn spawn(
        &self,
        parent: &RouteRecord,
        generation_key: &GenerationKey,
        seeds: &[u64],
    ) -> Result<Vec<RouteRecord>> {
        let mutator = TwoOptMutator::new(self.distances, self.ids);
        let child = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            mutator.child_in(parent, generation_key.clone(), &mut rng)
        };

        #[cfg(feature = "parallel")]
        if self.parallel {
            return seeds.par_iter().map(|&seed| child(seed)).collect();
        }

        seeds.iter().map(|&seed| child(seed)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::tour_length;
    use crate::models::Tour;
    use crate::store::{InMemoryStore, RandomIdSource, RouteSource};

    fn sample_matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0, 3.0, 9.0, 4.0],
            vec![1.0, 0.0, 4.0, 5.0, 2.0, 7.0],
            vec![2.0, 4.0, 0.0, 6.0, 3.0, 1.0],
            vec![3.0, 5.0, 6.0, 0.0, 8.0, 2.0],
            vec![9.0, 2.0, 3.0, 8.0, 0.0, 5.0],
            vec![4.0, 7.0, 1.0, 2.0, 5.0, 0.0],
        ])
        .expect("valid")
    }

    fn parent(dm: &DistanceMatrix) -> RouteRecord {
        let tour = Tour::new(vec![0, 1, 2, 3, 4, 5]);
        RouteRecord {
            route_id: "parent".into(),
            generation_key: GenerationKey::new("run", 7).expect("valid"),
            length: tour_length(tour.locations(), dm),
            tour,
        }
    }

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_three_children_ranked() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);

        let ranked = processor
            .produce_batch(&parent(&dm), 3, LengthThreshold::Unbounded, &mut rng(1))
            .expect("batch");
        assert_eq!(ranked.len(), 3);
        assert!(ranked
            .entries()
            .windows(2)
            .all(|w| w[0].length <= w[1].length));
        assert!(ranked.entries().iter().all(|e| e.length >= 0.0));
        assert_eq!(store.route_count(), 3);

        for entry in ranked.entries() {
            let stored = store.fetch_route(&entry.route_id).expect("persisted");
            assert_eq!(stored.length, entry.length);
            assert_eq!(stored.generation_key.to_string(), "run#8");
            assert!(stored.tour.validate(6).is_ok());
        }
    }

    #[test]
    fn test_threshold_below_all_children() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);

        let ranked = processor
            .produce_batch(&parent(&dm), 10, LengthThreshold::Below(0.0), &mut rng(2))
            .expect("batch");
        assert!(ranked.is_empty());
        assert_eq!(store.route_count(), 0);
    }

    #[test]
    fn test_threshold_filters_strictly() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);
        let parent = parent(&dm);

        let unfiltered = processor
            .produce_batch(&parent, 20, LengthThreshold::Unbounded, &mut rng(3))
            .expect("batch");
        let bound = unfiltered.entries()[10].length;

        let store = InMemoryStore::new();
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);
        let filtered = processor
            .produce_batch(&parent, 20, LengthThreshold::Below(bound), &mut rng(3))
            .expect("batch");

        let expected: Vec<f64> = unfiltered
            .entries()
            .iter()
            .map(|e| e.length)
            .filter(|&l| l < bound)
            .collect();
        let actual: Vec<f64> = filtered.entries().iter().map(|e| e.length).collect();
        assert_eq!(actual, expected);
        assert_eq!(store.route_count(), expected.len());
    }

    #[test]
    fn test_batch_too_large() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);
        let mut rng = rng(4);
        let before = rng.clone();

        let err = processor
            .produce_batch(&parent(&dm), 26, LengthThreshold::Unbounded, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            EvolveError::BatchTooLarge {
                requested: 26,
                limit: 25
            }
        ));
        // Nothing was sampled or written.
        assert_eq!(rng, before);
        assert_eq!(store.route_count(), 0);
    }

    #[test]
    fn test_lowered_limit() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let processor =
            ChildBatchProcessor::new(&dm, &RandomIdSource, &store).with_max_batch_size(5);
        assert_eq!(processor.max_batch_size(), 5);
        assert!(processor
            .produce_batch(&parent(&dm), 6, LengthThreshold::Unbounded, &mut rng(5))
            .is_err());

        let raised = ChildBatchProcessor::new(&dm, &RandomIdSource, &store).with_max_batch_size(100);
        assert_eq!(raised.max_batch_size(), 25);
    }

    #[test]
    fn test_malformed_parent_tour() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);
        let mut bad = parent(&dm);
        bad.tour = Tour::new(vec![0, 1, 2, 3]);

        let err = processor
            .produce_batch(&bad, 3, LengthThreshold::Unbounded, &mut rng(6))
            .unwrap_err();
        assert!(matches!(err, EvolveError::MalformedTour { len: 4, size: 6, .. }));
    }

    #[test]
    fn test_write_failure_still_returns_ranking() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        store.set_writes_fail(true);
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);

        let ranked = processor
            .produce_batch(&parent(&dm), 4, LengthThreshold::Unbounded, &mut rng(7))
            .expect("write failures do not fail the batch");
        assert_eq!(ranked.len(), 4);
        assert_eq!(store.route_count(), 0);
    }

    #[test]
    fn test_serial_and_parallel_agree() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let serial = ChildBatchProcessor::new(&dm, &RandomIdSource, &store).with_parallel(false);
        let parallel = ChildBatchProcessor::new(&dm, &RandomIdSource, &store).with_parallel(true);
        let parent = parent(&dm);

        let a = serial
            .produce_batch(&parent, 12, LengthThreshold::Unbounded, &mut rng(9))
            .expect("batch");
        let b = parallel
            .produce_batch(&parent, 12, LengthThreshold::Unbounded, &mut rng(9))
            .expect("batch");

        // IDs are random; lengths come from the seeded tours.
        let lengths = |r: &RankedSummary| r.entries().iter().map(|e| e.length).collect::<Vec<_>>();
        assert_eq!(lengths(&a), lengths(&b));
    }

    #[test]
    fn test_zero_children() {
        let dm = sample_matrix();
        let store = InMemoryStore::new();
        let processor = ChildBatchProcessor::new(&dm, &RandomIdSource, &store);
        let ranked = processor
            .produce_batch(&parent(&dm), 0, LengthThreshold::Unbounded, &mut rng(10))
            .expect("batch");
        assert!(ranked.is_empty());
    }
}

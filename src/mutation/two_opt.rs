//! 2-opt point mutation.
//!
//! # Algorithm
//!
//! Reversing the segment `tour[i..j]` of a cyclic tour removes the edges
//! `(tour[i-1], tour[i])` and `(tour[j-1], tour[j])` and reconnects the ends
//! the other way round:
//!
//! ```text
//! child = tour[..i] ++ reverse(tour[i..j]) ++ tour[j..]
//! ```
//!
//! A reversal reorders locations without adding or dropping any, so the child
//! is a permutation whenever the parent is.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::evaluation::tour_length;
use crate::models::{GenerationKey, RouteRecord, Tour};
use crate::sampling::{random_cut_points, CutPoints};
use crate::store::IdSource;

/// Returns a copy of `parent` with the segment `cut.start()..cut.end()`
/// reversed.
///
/// # Panics
///
/// Panics if `cut.end()` exceeds the tour length.
///
/// # Examples
///
/// ```
/// use u_evoroute::models::Tour;
/// use u_evoroute::mutation::reverse_segment;
/// use u_evoroute::sampling::CutPoints;
///
/// let parent = Tour::new(vec![0, 1, 2, 3, 4, 5]);
/// let cut = CutPoints::new(1, 4, 6).unwrap();
/// assert_eq!(reverse_segment(&parent, cut).locations(), &[0, 3, 2, 1, 4, 5]);
/// ```
pub fn reverse_segment(parent: &Tour, cut: CutPoints) -> Tour {
    let mut child = parent.locations().to_vec();
    child[cut.start()..cut.end()].reverse();
    Tour::new(child)
}

/// Derives scored child routes from a parent route by random 2-opt moves.
///
/// Each child gets a fresh ID and the parent's generation key plus one. The
/// mutator only reads the matrix and the parent, so children can be produced
/// from independent random sources in any order.
pub struct TwoOptMutator<'a> {
    distances: &'a DistanceMatrix,
    ids: &'a dyn IdSource,
}

impl<'a> TwoOptMutator<'a> {
    /// Creates a mutator scoring against `distances` and naming children from
    /// `ids`.
    pub fn new(distances: &'a DistanceMatrix, ids: &'a dyn IdSource) -> Self {
        Self { distances, ids }
    }

    /// Produces one child of `parent`.
    ///
    /// # Errors
    ///
    /// - [`MalformedTour`](crate::error::EvolveError::MalformedTour) if the
    ///   parent tour is not a permutation covering the matrix
    /// - [`MalformedGenerationKey`](crate::error::EvolveError::MalformedGenerationKey)
    ///   if the generation number overflows
    /// - [`SamplingExhausted`](crate::error::EvolveError::SamplingExhausted)
    ///   from cut-point sampling
    pub fn generate_child<R: Rng>(&self, parent: &RouteRecord, rng: &mut R) -> Result<RouteRecord> {
        parent.tour.validate(self.distances.size())?;
        let generation_key = parent.generation_key.next()?;
        self.child_in(parent, generation_key, rng)
    }

    /// Produces `count` independent children of `parent`.
    ///
    /// Each child draws from its own [`ChaCha8Rng`] seeded from `rng`, the
    /// same way [`ChildBatchProcessor`](crate::batch::ChildBatchProcessor)
    /// seeds its children, so both give the same tours for the same `rng`.
    /// Errors are those of [`generate_child`](Self::generate_child).
    pub fn generate_children<R: Rng>(
        &self,
        parent: &RouteRecord,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<RouteRecord>> {
        parent.tour.validate(self.distances.size())?;
        let generation_key = parent.generation_key.next()?;
        let seeds: Vec<u64> = (0..count).map(|_| rng.random()).collect();
        seeds
            .into_iter()
            .map(|seed| {
                let mut child_rng = ChaCha8Rng::seed_from_u64(seed);
                self.child_in(parent, generation_key.clone(), &mut child_rng)
            })
            .collect()
    }

    /// Parent validation is the caller's job.
    pub(crate) fn child_in<R: Rng>(
        &self,
        parent: &RouteRecord,
        generation_key: GenerationKey,
        rng: &mut R,
    ) -> Result<RouteRecord> {
        let cut = random_cut_points(parent.tour.len(), rng)?;
        let tour = reverse_segment(&parent.tour, cut);
        let length = tour_length(tour.locations(), self.distances);
        let route_id = self.ids.new_id();
        debug!(
            parent = %parent.route_id,
            child = %route_id,
            start = cut.start(),
            end = cut.end(),
            length,
            "generated child"
        );
        Ok(RouteRecord {
            route_id,
            generation_key,
            tour,
            length,
        })
    }
}

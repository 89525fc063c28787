//! Random initial tour (seeding path).
//!
//! Seeds a run with a tour drawn uniformly from all orderings. It is not
//! derived from a parent, so it keeps the generation key it is given.

use rand::Rng;
use tracing::info;

use crate::distance::DistanceMatrix;
use crate::evaluation::tour_length;
use crate::models::{GenerationKey, RouteRecord};
use crate::sampling::random_permutation;
use crate::store::IdSource;

/// Creates a scored route over every location of `distances` in uniformly
/// random order.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use u_evoroute::constructive::seed_route;
/// use u_evoroute::distance::DistanceMatrix;
/// use u_evoroute::models::GenerationKey;
/// use u_evoroute::store::RandomIdSource;
///
/// let dm = DistanceMatrix::from_data(5, vec![1.0; 25]).unwrap();
/// let key = GenerationKey::new("run", 0).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
///
/// let route = seed_route(&dm, key.clone(), &RandomIdSource, &mut rng);
/// assert_eq!(route.generation_key, key);
/// assert_eq!(route.tour.len(), 5);
/// assert_eq!(route.length, 5.0);
/// ```
pub fn seed_route<R: Rng>(
    distances: &DistanceMatrix,
    generation_key: GenerationKey,
    ids: &dyn IdSource,
    rng: &mut R,
) -> RouteRecord {
    let tour = random_permutation(distances.size(), rng);
    let length = tour_length(tour.locations(), distances);
    let route_id = ids.new_id();
    info!(route = %route_id, generation = %generation_key, length, "seeded route");
    RouteRecord {
        route_id,
        generation_key,
        tour,
        length,
    }
}

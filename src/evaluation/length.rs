//! Closed-cycle tour length.

use crate::distance::DistanceMatrix;
use crate::models::Tour;

/// Computes the length of `tour` read as a closed cycle:
/// `tour[0] → tour[1] → ... → tour[n-1] → tour[0]`.
///
/// The closing edge runs back to the tour's own first entry, whatever
/// location that is. An empty tour has length zero.
///
/// # Panics
///
/// Panics if any location is out of the matrix's bounds.
///
/// # Examples
///
/// ```
/// use u_evoroute::distance::DistanceMatrix;
/// use u_evoroute::evaluation::tour_length;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 4.0, 5.0],
///     vec![2.0, 4.0, 0.0, 6.0],
///     vec![3.0, 5.0, 6.0, 0.0],
/// ]).unwrap();
/// // 1 + 4 + 6 + 3
/// assert_eq!(tour_length(&[0, 1, 2, 3], &dm), 14.0);
/// ```
pub fn tour_length(tour: &[usize], distances: &DistanceMatrix) -> f64 {
    let (Some(&first), Some(&last)) = (tour.first(), tour.last()) else {
        return 0.0;
    };
    let open: f64 = tour
        .windows(2)
        .map(|edge| distances.cost(edge[0], edge[1]))
        .sum();
    open + distances.cost(last, first)
}

/// Scores tours against one distance matrix.
///
/// All length computations in the crate go through [`tour_length`]; this is
/// a convenience binding of it to a matrix.
#[derive(Debug, Clone, Copy)]
pub struct TourEvaluator<'a> {
    distances: &'a DistanceMatrix,
}

impl<'a> TourEvaluator<'a> {
    /// Creates an evaluator for the given matrix.
    pub fn new(distances: &'a DistanceMatrix) -> Self {
        Self { distances }
    }

    /// Length of `tour` as a closed cycle.
    pub fn length(&self, tour: &Tour) -> f64 {
        tour_length(tour.locations(), self.distances)
    }

    /// The matrix this evaluator scores against.
    pub fn distances(&self) -> &'a DistanceMatrix {
        self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 4.0, 5.0],
            vec![2.0, 4.0, 0.0, 6.0],
            vec![3.0, 5.0, 6.0, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_known_length() {
        let dm = sample_matrix();
        assert!((tour_length(&[0, 1, 2, 3], &dm) - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_rotation_invariant() {
        let dm = sample_matrix();
        let tour = [2, 0, 3, 1];
        let base = tour_length(&tour, &dm);
        for shift in 1..tour.len() {
            let mut rotated = tour.to_vec();
            rotated.rotate_left(shift);
            assert!((tour_length(&rotated, &dm) - base).abs() < 1e-10);
        }
    }

    #[test]
    fn test_not_relabel_invariant() {
        let mut rows = sample_matrix().to_rows();
        rows[0][1] = 10.0;
        rows[1][0] = 10.0;
        let skewed = DistanceMatrix::from_rows(rows).expect("valid");
        // 10 + 4 + 6 + 3 vs 2 + 4 + 5 + 3
        assert!((tour_length(&[0, 1, 2, 3], &skewed) - 23.0).abs() < 1e-10);
        assert!((tour_length(&[0, 2, 1, 3], &skewed) - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_closing_edge_uses_first_entry() {
        let mut rows = sample_matrix().to_rows();
        rows[1][2] = 100.0;
        let dm = DistanceMatrix::from_rows(rows).expect("valid");
        // 2→0→3→1 closes with 1→2, not 1→0
        assert!((tour_length(&[2, 0, 3, 1], &dm) - (2.0 + 3.0 + 5.0 + 100.0)).abs() < 1e-10);
    }

    #[test]
    fn test_empty_and_single() {
        let dm = sample_matrix();
        assert_eq!(tour_length(&[], &dm), 0.0);
        assert_eq!(tour_length(&[2], &dm), 0.0);
    }

    #[test]
    fn test_evaluator() {
        let dm = sample_matrix();
        let evaluator = TourEvaluator::new(&dm);
        assert!((evaluator.length(&Tour::new(vec![3, 2, 1, 0])) - 14.0).abs() < 1e-10);
        assert_eq!(evaluator.distances().size(), 4);
    }
}

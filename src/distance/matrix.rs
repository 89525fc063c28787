//! Dense, validated distance matrix.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EvolveError, Result};

/// Smallest number of locations a matrix may cover.
///
/// A 2-opt cut needs a reversed segment of at least two entries with at
/// least one entry outside it; fewer than four locations leaves no move that
/// changes the cycle.
pub const MIN_LOCATIONS: usize = 4;

/// A dense n×n travel-cost matrix stored in row-major order.
///
/// Construction validates that the table is square, covers at least
/// [`MIN_LOCATIONS`] locations and holds only non-negative costs. The diagonal
/// is never consulted by tour evaluation.
///
/// # Examples
///
/// ```
/// use u_evoroute::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 4.0, 5.0],
///     vec![2.0, 4.0, 0.0, 6.0],
///     vec![3.0, 5.0, 6.0, 0.0],
/// ]).unwrap();
/// assert_eq!(dm.size(), 4);
/// assert_eq!(dm.cost(1, 2), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix from nested rows.
    ///
    /// # Errors
    ///
    /// [`EvolveError::MalformedMatrix`] if any row length differs from the
    /// row count, there are fewer than [`MIN_LOCATIONS`] rows, or any cost is
    /// negative or NaN.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(EvolveError::MalformedMatrix {
                size,
                reason: format!("row {row} has {} entries, expected {size}", r.len()),
            });
        }
        Self::from_data(size, rows.into_iter().flatten().collect())
    }

    /// Creates a distance matrix from an explicit row-major n×n grid.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_rows`](Self::from_rows); additionally the
    /// data length must equal `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(EvolveError::MalformedMatrix {
                size,
                reason: format!("{} entries cannot form a {size}x{size} table", data.len()),
            });
        }
        if size < MIN_LOCATIONS {
            return Err(EvolveError::MalformedMatrix {
                size,
                reason: format!("at least {MIN_LOCATIONS} locations are required"),
            });
        }
        // `!(c >= 0.0)` also rejects NaN.
        if let Some(pos) = data.iter().position(|&c| !(c >= 0.0)) {
            return Err(EvolveError::MalformedMatrix {
                size,
                reason: format!(
                    "cost from {} to {} is {}, costs must be non-negative",
                    pos / size,
                    pos % size,
                    data[pos]
                ),
            });
        }

        let dm = Self { data, size };
        if !dm.is_symmetric(1e-9) {
            warn!(size, "distance matrix is not symmetric");
        }
        Ok(dm)
    }

    /// Returns the travel cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.cost(i, j) - self.cost(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the matrix as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.size).map(<[f64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = EvolveError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(dm: DistanceMatrix) -> Self {
        dm.to_rows()
    }
}

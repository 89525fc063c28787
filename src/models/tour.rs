//! Tour type.

use serde::{Deserialize, Serialize};

use crate::error::{EvolveError, Result};

/// An ordered sequence of location indices, read as a closed cycle.
///
/// A valid tour over `n` locations is a permutation of `0..n`; the edge from
/// the last entry back to the first is part of the cycle. `Tour` does not
/// enforce this on construction (stored records are untrusted); call
/// [`validate`](Self::validate) before mutating one.
///
/// # Examples
///
/// ```
/// use u_evoroute::models::Tour;
///
/// let tour = Tour::new(vec![2, 0, 3, 1]);
/// assert_eq!(tour.len(), 4);
/// assert!(tour.validate(4).is_ok());
/// assert!(tour.validate(5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour {
    locations: Vec<usize>,
}

impl Tour {
    /// Creates a tour from a location sequence.
    pub fn new(locations: Vec<usize>) -> Self {
        Self { locations }
    }

    /// Returns the location sequence.
    pub fn locations(&self) -> &[usize] {
        &self.locations
    }

    /// Number of locations in this tour.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if the tour visits no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Consumes the tour, returning the location sequence.
    pub fn into_inner(self) -> Vec<usize> {
        self.locations
    }

    /// Checks that this tour is a permutation of `0..size`.
    ///
    /// # Errors
    ///
    /// [`EvolveError::MalformedTour`] naming the first defect found.
    pub fn validate(&self, size: usize) -> Result<()> {
        let malformed = |reason: String| EvolveError::MalformedTour {
            len: self.len(),
            size,
            reason,
        };

        if self.len() != size {
            return Err(malformed(format!(
                "expected {size} locations, found {}",
                self.len()
            )));
        }
        let mut seen = vec![false; size];
        for (pos, &loc) in self.locations.iter().enumerate() {
            if loc >= size {
                return Err(malformed(format!(
                    "location {loc} at position {pos} is out of range"
                )));
            }
            if seen[loc] {
                return Err(malformed(format!(
                    "location {loc} repeats at position {pos}"
                )));
            }
            seen[loc] = true;
        }
        Ok(())
    }
}

impl From<Vec<usize>> for Tour {
    fn from(locations: Vec<usize>) -> Self {
        Self::new(locations)
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.locations
    }
}

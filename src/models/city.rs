//! Cities and the distance data set of a region.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{EvolveError, Result};

/// A location of a region, identified by its matrix index.
///
/// Extra attributes of a city document (name, coordinates) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    /// Row/column of this city in the region's distance matrix.
    pub index: usize,
}

impl City {
    /// Creates a city with the given matrix index.
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

#[derive(Deserialize)]
struct RawDistanceData {
    cities: Vec<City>,
    distances: DistanceMatrix,
}

/// The cities of a region together with their distance matrix.
///
/// The city list always covers exactly the indices `0..n` of the matrix.
///
/// # Examples
///
/// ```
/// use u_evoroute::models::DistanceData;
///
/// let data = DistanceData::from_json_str(r#"{
///     "cities": [{"index": 0}, {"index": 1}, {"index": 2}, {"index": 3}],
///     "distances": [[0,1,2,3],[1,0,4,5],[2,4,0,6],[3,5,6,0]]
/// }"#).unwrap();
/// assert_eq!(data.cities().len(), 4);
/// assert_eq!(data.distances().cost(2, 3), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistanceData")]
pub struct DistanceData {
    cities: Vec<City>,
    distances: DistanceMatrix,
}

impl DistanceData {
    /// Pairs a city list with its matrix.
    ///
    /// # Errors
    ///
    /// [`EvolveError::MalformedDistanceData`] if the cities don't list each
    /// matrix index exactly once.
    pub fn new(cities: Vec<City>, distances: DistanceMatrix) -> Result<Self> {
        let size = distances.size();
        let malformed = |reason: String| EvolveError::MalformedDistanceData {
            cities: cities.len(),
            size,
            reason,
        };

        if cities.len() != size {
            return Err(malformed("city count differs from matrix size".into()));
        }
        let mut seen = vec![false; size];
        for city in &cities {
            match seen.get_mut(city.index) {
                None => return Err(malformed(format!("city index {} is out of range", city.index))),
                Some(true) => return Err(malformed(format!("city index {} is listed twice", city.index))),
                Some(slot) => *slot = true,
            }
        }
        Ok(Self { cities, distances })
    }

    /// Parses a `{ "cities": [...], "distances": [[...]] }` document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| EvolveError::MalformedDistanceData {
            cities: 0,
            size: 0,
            reason: e.to_string(),
        })
    }

    /// The cities in stored order.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// The travel-cost matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.cities.len()
    }
}

impl TryFrom<RawDistanceData> for DistanceData {
    type Error = EvolveError;

    fn try_from(raw: RawDistanceData) -> Result<Self> {
        Self::new(raw.cities, raw.distances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> DistanceMatrix {
        DistanceMatrix::from_data(4, vec![1.0; 16]).expect("valid")
    }

    #[test]
    fn test_new() {
        let cities = vec![City::new(3), City::new(1), City::new(0), City::new(2)];
        let data = DistanceData::new(cities.clone(), matrix()).expect("valid");
        assert_eq!(data.cities(), cities.as_slice());
        assert_eq!(data.size(), 4);
    }

    #[test]
    fn test_count_mismatch() {
        let cities = vec![City::new(0), City::new(1), City::new(2)];
        let err = DistanceData::new(cities, matrix()).unwrap_err();
        assert!(matches!(
            err,
            EvolveError::MalformedDistanceData { cities: 3, size: 4, .. }
        ));
    }

    #[test]
    fn test_duplicate_index() {
        let cities = vec![City::new(0), City::new(1), City::new(1), City::new(2)];
        let err = DistanceData::new(cities, matrix()).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_index_out_of_range() {
        let cities = vec![City::new(0), City::new(1), City::new(2), City::new(4)];
        assert!(DistanceData::new(cities, matrix()).is_err());
    }

    #[test]
    fn test_from_json_ignores_extra_city_fields() {
        let data = DistanceData::from_json_str(
            r#"{
                "region": "Minnesota",
                "cities": [
                    {"index": 0, "name": "Morris"},
                    {"index": 1, "name": "Alexandria"},
                    {"index": 2, "name": "Fergus Falls"},
                    {"index": 3, "name": "Willmar"}
                ],
                "distances": [[0,1,2,3],[1,0,4,5],[2,4,0,6],[3,5,6,0]]
            }"#,
        )
        .expect("valid");
        assert_eq!(data.size(), 4);
        assert_eq!(data.distances().cost(0, 3), 3.0);
    }

    #[test]
    fn test_from_json_bad_matrix() {
        let err = DistanceData::from_json_str(
            r#"{"cities": [{"index": 0}], "distances": [[0]]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EvolveError::MalformedDistanceData { .. }));
    }
}

//! Length threshold for persisting children.

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) on the length of children worth keeping.
///
/// Serializes as an optional number: `null` or absent means
/// [`Unbounded`](Self::Unbounded).
///
/// # Examples
///
/// ```
/// use u_evoroute::batch::LengthThreshold;
///
/// assert!(LengthThreshold::Unbounded.admits(1e300));
/// assert!(LengthThreshold::Below(10.0).admits(9.5));
/// assert!(!LengthThreshold::Below(10.0).admits(10.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum LengthThreshold {
    /// Keep every child.
    #[default]
    Unbounded,
    /// Keep children strictly shorter than the bound.
    Below(f64),
}

impl LengthThreshold {
    /// Returns `true` if a child of this length is kept.
    pub fn admits(&self, length: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Below(bound) => length < *bound,
        }
    }
}

impl From<Option<f64>> for LengthThreshold {
    fn from(bound: Option<f64>) -> Self {
        bound.map_or(Self::Unbounded, Self::Below)
    }
}

impl From<LengthThreshold> for Option<f64> {
    fn from(threshold: LengthThreshold) -> Self {
        match threshold {
            LengthThreshold::Unbounded => None,
            LengthThreshold::Below(bound) => Some(bound),
        }
    }
}

//! Random 2-opt cut points.

use rand::Rng;
use tracing::debug;

use crate::error::{EvolveError, Result};

/// Retry cap for the rejection loop in [`random_cut_points`].
///
/// A draw is accepted with probability `(n-1) / (2(n+1))`, at least 0.3 for
/// n ≥ 4, so reaching this cap means the random source is broken.
pub const MAX_CUT_ATTEMPTS: usize = 100_000;

/// A pair of slice boundaries `start < end` with `end - start >= 2`.
///
/// The half-open segment `start..end` is the part of a tour a 2-opt move
/// reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CutPoints {
    start: usize,
    end: usize,
}

impl CutPoints {
    /// Creates cut points for a tour of `n` locations.
    ///
    /// Returns `None` unless `start < end <= n` and `end - start >= 2`.
    pub fn new(start: usize, end: usize, n: usize) -> Option<Self> {
        if end <= n && start < end && end - start >= 2 {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// First position of the reversed segment.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last position of the reversed segment.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of positions reversed.
    pub fn segment_len(&self) -> usize {
        self.end - self.start
    }
}

/// Draws cut points uniformly over all valid pairs for a tour of `n`
/// locations.
///
/// Rejection sampling: `i` from `0..n` and `j` from `0..=n` independently,
/// redrawn until `j - i >= 2`.
///
/// # Errors
///
/// [`EvolveError::SamplingExhausted`] if no pair is accepted within
/// [`MAX_CUT_ATTEMPTS`] draws, or immediately when `n < 2` (no valid pair
/// exists).
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use u_evoroute::sampling::random_cut_points;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let cut = random_cut_points(10, &mut rng).unwrap();
/// assert!(cut.end() <= 10);
/// assert!(cut.segment_len() >= 2);
/// ```
pub fn random_cut_points<R: Rng>(n: usize, rng: &mut R) -> Result<CutPoints> {
    random_cut_points_bounded(n, MAX_CUT_ATTEMPTS, rng)
}

fn random_cut_points_bounded<R: Rng>(
    n: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<CutPoints> {
    if n < 2 {
        return Err(EvolveError::SamplingExhausted {
            size: n,
            attempts: 0,
        });
    }

    for attempt in 1..=max_attempts {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..=n);
        if let Some(cut) = CutPoints::new(i, j, n) {
            debug!(n, start = i, end = j, attempt, "sampled cut points");
            return Ok(cut);
        }
    }

    Err(EvolveError::SamplingExhausted {
        size: n,
        attempts: max_attempts,
    })
}

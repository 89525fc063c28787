//! Run-and-generation composite key.
//!
//! A key reads `runId#generation`: an opaque run token, exactly one `#`, and a
//! non-negative generation number. Children of a route always carry the
//! parent's key with the generation incremented by one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EvolveError, Result};

/// Separator between the run token and the generation number.
pub const SEPARATOR: char = '#';

/// A parsed `runId#generation` key.
///
/// # Examples
///
/// ```
/// use u_evoroute::models::GenerationKey;
///
/// let key: GenerationKey = "abc#17".parse().unwrap();
/// assert_eq!(key.run_id(), "abc");
/// assert_eq!(key.generation(), 17);
/// assert_eq!(key.next().unwrap().to_string(), "abc#18");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GenerationKey {
    run_id: String,
    generation: u64,
}

impl GenerationKey {
    /// Creates a key from its parts.
    ///
    /// # Errors
    ///
    /// [`EvolveError::MalformedGenerationKey`] if `run_id` contains the
    /// separator.
    pub fn new(run_id: impl Into<String>, generation: u64) -> Result<Self> {
        let run_id = run_id.into();
        if run_id.contains(SEPARATOR) {
            return Err(EvolveError::MalformedGenerationKey {
                key: format!("{run_id}{SEPARATOR}{generation}"),
                reason: "run id must not contain '#'",
            });
        }
        Ok(Self { run_id, generation })
    }

    /// Parses a `runId#generation` string.
    pub fn parse(key: &str) -> Result<Self> {
        let malformed = |reason| EvolveError::MalformedGenerationKey {
            key: key.to_string(),
            reason,
        };

        let (run_id, suffix) = key
            .split_once(SEPARATOR)
            .ok_or_else(|| malformed("missing '#' separator"))?;
        if suffix.contains(SEPARATOR) {
            return Err(malformed("more than one '#' separator"));
        }
        // u64::from_str accepts a leading '+'; only plain digits are allowed.
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("generation is not a non-negative integer"));
        }
        let generation = suffix
            .parse()
            .map_err(|_| malformed("generation does not fit in 64 bits"))?;

        Ok(Self {
            run_id: run_id.to_string(),
            generation,
        })
    }

    /// The opaque run token.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the key of the following generation in the same run.
    ///
    /// # Errors
    ///
    /// [`EvolveError::MalformedGenerationKey`] if the generation number would
    /// overflow.
    pub fn next(&self) -> Result<Self> {
        let generation = self.generation.checked_add(1).ok_or_else(|| {
            EvolveError::MalformedGenerationKey {
                key: self.to_string(),
                reason: "generation number overflows",
            }
        })?;
        Ok(Self {
            run_id: self.run_id.clone(),
            generation,
        })
    }
}

/// Increments the generation of a `runId#generation` string by one.
///
/// ```
/// use u_evoroute::models::next_generation;
///
/// assert_eq!(next_generation("abc#17").unwrap(), "abc#18");
/// assert!(next_generation("abc17").is_err());
/// ```
pub fn next_generation(key: &str) -> Result<String> {
    Ok(GenerationKey::parse(key)?.next()?.to_string())
}

impl fmt::Display for GenerationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.run_id, self.generation)
    }
}

impl FromStr for GenerationKey {
    type Err = EvolveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GenerationKey {
    type Error = EvolveError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<GenerationKey> for String {
    fn from(key: GenerationKey) -> Self {
        key.to_string()
    }
}

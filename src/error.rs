//! Error types for route mutation and evaluation.
//!
//! Every variant carries enough context (sizes, offending input, limits) for a
//! response layer to build a diagnostic message without re-inspecting the
//! request.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for engine operations.
#[derive(Debug, Error)]
pub enum EvolveError {
    /// The distance table is not usable as an N×N cost matrix.
    #[error("malformed distance matrix ({size} locations): {reason}")]
    MalformedMatrix {
        /// Number of locations (rows) supplied.
        size: usize,
        /// Which validation failed.
        reason: String,
    },

    /// The city list does not match the distance matrix it ships with.
    #[error("malformed distance data ({cities} cities, {size}x{size} matrix): {reason}")]
    MalformedDistanceData {
        /// Number of cities listed.
        cities: usize,
        /// Matrix dimension.
        size: usize,
        /// Which validation failed.
        reason: String,
    },

    /// A tour is not a permutation of `0..size`.
    #[error("malformed tour of length {len} for {size} locations: {reason}")]
    MalformedTour {
        /// Number of entries in the tour.
        len: usize,
        /// Number of locations expected.
        size: usize,
        /// Which validation failed.
        reason: String,
    },

    /// A `runId#generation` key could not be parsed.
    #[error("malformed generation key {key:?}: {reason}")]
    MalformedGenerationKey {
        /// The rejected key.
        key: String,
        /// Which validation failed.
        reason: &'static str,
    },

    /// More children were requested than one atomic write can hold.
    #[error("batch of {requested} children exceeds the limit of {limit}")]
    BatchTooLarge {
        /// Requested number of children.
        requested: usize,
        /// Maximum batch size accepted.
        limit: usize,
    },

    /// Cut-point rejection sampling hit its retry cap.
    #[error("no valid cut points for {size} locations after {attempts} attempts")]
    SamplingExhausted {
        /// Tour size sampled for.
        size: usize,
        /// Attempts made before giving up.
        attempts: usize,
    },

    /// The distance source has no data for the region.
    #[error("no distance data for region {region:?}")]
    DataUnavailable {
        /// Requested region.
        region: String,
    },

    /// The route source has no record with this ID.
    #[error("route {route_id:?} not found")]
    NotFound {
        /// Requested route ID.
        route_id: String,
    },

    /// A single-record write was not stored.
    #[error("route {route_id:?} was not persisted")]
    Persistence {
        /// ID of the record that failed to persist.
        route_id: String,
    },

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EvolveError>;

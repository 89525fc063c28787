//! Engine configuration.
//!
//! [`EngineConfig`] holds the parameters the [`RouteService`](crate::service::RouteService)
//! needs: which region to read distances from, the batch limit, parallelism
//! and seeding. It can be built in code or loaded from TOML.
//!
//! ```
//! use u_evoroute::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     region = "Minnesota"
//!     max_batch_size = 10
//!     seed = 7
//! "#).unwrap();
//!
//! assert_eq!(config.max_batch_size, 10);
//! assert_eq!(config.seed, Some(7));
//! assert!(config.parallel);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default region the distance data is read from.
pub const DEFAULT_REGION: &str = "Minnesota";

/// Default maximum number of children produced (and written) per batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 25;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the route service.
///
/// # Builder Pattern
///
/// ```
/// use u_evoroute::config::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_region("Wisconsin")
///     .with_max_batch_size(20)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Region whose distance data every call uses.
    pub region: String,

    /// Largest number of children a single mutation call may produce.
    ///
    /// The store's own limit still applies; the smaller of the two wins.
    pub max_batch_size: usize,

    /// Whether children are computed with rayon (requires the `parallel`
    /// feature).
    pub parallel: bool,

    /// Random seed for reproducible calls. Each call of a service uses its
    /// own stream of this seed.
    ///
    /// `None` draws a fresh seed per call.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            parallel: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, contains invalid TOML, or
    /// fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the distance data region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the maximum batch size.
    pub fn with_max_batch_size(mut self, n: usize) -> Self {
        self.max_batch_size = n;
        self
    }

    /// Enables or disables parallel child generation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid("region is empty".into()));
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "max_batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

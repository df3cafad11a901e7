//! Configuration for the document service
use crate::tree::DeletePolicy;
use crate::utils::DEFAULT_MAX_SLUG_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Broadcast channel capacity for domain events.
///
/// Enough headroom for a burst of moves from a drag session; lagging
/// subscribers only miss invalidations, and they re-read the project anyway.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Environment variable overriding [`TreeConfig::delete_policy`]
pub const ENV_DELETE_POLICY: &str = "TEAMSPACE_DELETE_POLICY";

/// Environment variable overriding [`TreeConfig::max_slug_attempts`]
pub const ENV_MAX_SLUG_ATTEMPTS: &str = "TEAMSPACE_MAX_SLUG_ATTEMPTS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// What happens to the children of a deleted document
    pub delete_policy: DeletePolicy,

    /// Upper bound on slug candidates tried per created document
    pub max_slug_attempts: usize,

    /// Capacity of the domain event broadcast channel
    pub event_channel_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            delete_policy: DeletePolicy::default(),
            max_slug_attempts: DEFAULT_MAX_SLUG_ATTEMPTS,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl TreeConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: TreeConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `TEAMSPACE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from a key lookup (the environment, in production)
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(policy) = lookup(ENV_DELETE_POLICY) {
            self.delete_policy = policy.parse().map_err(ConfigError::Invalid)?;
        }

        if let Some(attempts) = lookup(ENV_MAX_SLUG_ATTEMPTS) {
            self.max_slug_attempts = attempts.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MAX_SLUG_ATTEMPTS, attempts
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_slug_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_slug_attempts must be greater than 0".to_string(),
            ));
        }

        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_channel_capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

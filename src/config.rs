//! Resolver configuration.
//!
//! Settings are read from a TOML file; every key is optional:
//!
//! ```toml
//! casing = "title"          # upper | lower | title | proper | none
//! case_sensitive = false    # in-memory directory matching
//! workers = 4               # batch worker threads
//! queue_capacity = 1024     # pending batch jobs
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::casing::CasingPolicy;
use crate::error::ConfigError;

const fn default_workers() -> usize {
    4
}

const fn default_queue_capacity() -> usize {
    1024
}

/// Runtime configuration for parsing, resolution and batch execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Casing applied when raw names are parsed.
    pub casing: CasingPolicy,
    /// Compare attributes case-sensitively in the in-memory directory.
    pub case_sensitive: bool,
    /// Number of batch worker threads.
    pub workers: usize,
    /// Maximum queued batch jobs.
    pub queue_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            casing: CasingPolicy::None,
            case_sensitive: false,
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl ResolverConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(toml_content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let toml_content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&toml_content)?;
        debug!(path = %path.display(), ?config, "loaded resolver config");
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "workers".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "queue_capacity".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{CleanupError, Result};
use crate::retention::RetentionPolicy;

/// Default log file, appended to on every run.
pub const DEFAULT_LOG_FILE: &str = "acr-cleanup.log";

/// Default registry tool executable.
pub const DEFAULT_AZ_PATH: &str = "az";

/// Resolved configuration for one cleanup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    /// Registry to clean
    pub registry: String,

    /// Report only, never delete
    pub dry_run: bool,

    /// Retention policy
    pub retention: RetentionPolicy,

    /// Maximum manifest listings in flight at once
    pub concurrency: usize,
}

impl CleanupConfig {
    /// Create a configuration with default retention and sequential listing.
    pub fn new(registry: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            dry_run: false,
            retention: RetentionPolicy::default(),
            concurrency: 1,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Check the configuration before any external call is made.
    pub fn validate(&self) -> Result<()> {
        if self.registry.trim().is_empty() {
            return Err(CleanupError::ConfigError(
                "registry name must not be empty".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(CleanupError::ConfigError(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Optional settings read from a YAML file.
///
/// Every key may be omitted; command-line flags take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanupFileConfig {
    #[serde(default)]
    pub retention_days: Option<u32>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub concurrency: Option<usize>,

    #[serde(default)]
    pub az_path: Option<PathBuf>,
}

impl CleanupFileConfig {
    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            CleanupError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&data)
    }

    /// Parse a config document. An empty document yields all defaults.
    pub fn from_yaml(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }
}

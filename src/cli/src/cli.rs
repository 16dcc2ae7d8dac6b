//! Command-line surface and configuration resolution.

use std::path::PathBuf;

use acr_cleanup_core::config::{DEFAULT_AZ_PATH, DEFAULT_LOG_FILE};
use acr_cleanup_core::{CleanupConfig, CleanupFileConfig, RetentionPolicy};
use clap::Parser;

/// Clean old Docker images out of an Azure Container Registry.
#[derive(Parser, Debug)]
#[command(name = "acr-cleanup", version, about)]
pub struct Cli {
    /// Name of the Azure Container Registry to clean
    #[arg(short, long, value_name = "REGISTRY")]
    pub name: String,

    /// Do a dry-run, no images will be deleted
    #[arg(long)]
    pub dry_run: bool,

    /// Delete images at least this many days old [default: 90]
    #[arg(long, value_name = "DAYS")]
    pub retention_days: Option<u32>,

    /// YAML file with default settings
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append the run log to this file [default: acr-cleanup.log]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Repositories whose manifests may be listed at once [default: 1]
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Path to the az executable [default: az]
    #[arg(long, value_name = "PATH")]
    pub az_path: Option<PathBuf>,
}

/// Everything the binary needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cleanup: CleanupConfig,
    pub log_file: PathBuf,
    pub az_path: PathBuf,
}

impl Cli {
    /// Resolve settings, reading the config file if one was given.
    pub fn settings(&self) -> acr_cleanup_core::Result<Settings> {
        let file = match &self.config {
            Some(path) => CleanupFileConfig::load(path)?,
            None => CleanupFileConfig::default(),
        };
        let settings = self.settings_with(file);
        settings.cleanup.validate()?;
        Ok(settings)
    }

    /// Log file to use when the config file itself cannot be loaded.
    pub fn fallback_log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Merge flags over file values over built-in defaults.
    pub fn settings_with(&self, file: CleanupFileConfig) -> Settings {
        let retention = self
            .retention_days
            .or(file.retention_days)
            .map(RetentionPolicy::new)
            .unwrap_or_default();

        let cleanup = CleanupConfig::new(self.name.clone())
            .with_dry_run(self.dry_run)
            .with_retention(retention)
            .with_concurrency(self.concurrency.or(file.concurrency).unwrap_or(1));

        Settings {
            cleanup,
            log_file: self
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            az_path: self
                .az_path
                .clone()
                .or(file.az_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AZ_PATH)),
        }
    }
}

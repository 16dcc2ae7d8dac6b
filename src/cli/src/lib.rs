//! ACR Cleanup CLI - deletes images past their retention window.

pub mod az;
pub mod cli;
pub mod logging;

use acr_cleanup_core::{CleanupPipeline, RunSummary, TracingReporter};
use anyhow::Result;

use crate::az::AzCliClient;
use crate::cli::Cli;

/// Resolve settings, set up logging, and run the cleanup.
pub async fn execute(cli: Cli) -> Result<RunSummary> {
    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            // The config file may be what names the log file, so fall back
            // to the flag or the default.
            logging::init(&cli.fallback_log_file())?;
            tracing::error!("Invalid configuration: {}", e);
            return Err(anyhow::Error::new(e).context("invalid configuration"));
        }
    };
    logging::init(&settings.log_file)?;

    let client = AzCliClient::new(&settings.az_path);
    let summary = CleanupPipeline::new(&client, &TracingReporter, settings.cleanup)
        .run()
        .await?;

    tracing::debug!(
        repositories = summary.repositories,
        manifests = summary.manifests_scanned,
        candidates = summary.candidate_count(),
        deleted = summary.deleted,
        "Run complete"
    );
    Ok(summary)
}

//! ACR Cleanup Core - retention-based cleanup of container registry images.
//!
//! This crate holds everything that does not depend on how the registry is
//! reached: the manifest model, the retention evaluator, the pipeline, and
//! the traits the binary plugs its registry client and reporter into.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod manifest;
pub mod pipeline;
pub mod retention;

// Re-export commonly used types
pub use client::RegistryClient;
pub use config::{CleanupConfig, CleanupFileConfig};
pub use error::{CleanupError, Result};
pub use event::{CleanupEvent, RecordingReporter, Reporter, TracingReporter};
pub use manifest::{parse_manifest_listing, parse_repository_listing, Manifest};
pub use pipeline::{CleanupPipeline, RunSummary};
pub use retention::{DeletionCandidate, Evaluation, RetentionPolicy, DEFAULT_RETENTION_DAYS};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Run events and the reporters that receive them.
//!
//! The pipeline never logs directly. It hands every step to a [`Reporter`],
//! so the binary can route events into `tracing` while tests record them.

use parking_lot::Mutex;
use tracing::Level;

/// Something observable that happened during a cleanup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupEvent {
    DryRun,
    IdentityLoginStarted,
    IdentityLoginSucceeded,
    RegistryLoginStarted { registry: String },
    RegistryLoginSucceeded { registry: String },
    RepositoriesFetching { registry: String },
    RepositoriesFetched { registry: String },
    RepositoriesListed { registry: String, count: usize },
    CheckingManifests,
    ManifestsPulled { repository: String },
    ManifestsListed { repository: String, count: usize },
    Eligible { image: String, age_days: i64 },
    Retained { image: String, age_days: i64 },
    CandidatesCounted { count: usize, dry_run: bool },
    Deleting { image: String },
    Deleted { image: String },
    DeletedTotal { count: usize },
    Failed { message: String },
}

impl CleanupEvent {
    /// Severity the event is reported at.
    pub fn level(&self) -> Level {
        match self {
            Self::Retained { .. } => Level::DEBUG,
            Self::Failed { .. } => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

impl std::fmt::Display for CleanupEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DryRun => write!(f, "THIS IS A DRY RUN. NO IMAGES WILL BE DELETED."),
            Self::IdentityLoginStarted => write!(f, "Login to Azure"),
            Self::IdentityLoginSucceeded => write!(f, "Successfully logged into Azure"),
            Self::RegistryLoginStarted { registry } => write!(f, "Login to ACR: {}", registry),
            Self::RegistryLoginSucceeded { registry } => {
                write!(f, "Successfully logged into ACR: {}", registry)
            }
            Self::RepositoriesFetching { registry } => {
                write!(f, "Fetching repositories in: {}", registry)
            }
            Self::RepositoriesFetched { registry } => {
                write!(f, "Successfully fetched repositories from: {}", registry)
            }
            Self::RepositoriesListed { registry, count } => {
                write!(f, "Total number of repositories in {}: {}", registry, count)
            }
            Self::CheckingManifests => write!(f, "Checking repository manifests"),
            Self::ManifestsPulled { repository } => {
                write!(f, "Successfully pulled manifests for: {}", repository)
            }
            Self::ManifestsListed { repository, count } => {
                write!(f, "Total number of manifests in {}: {}", repository, count)
            }
            Self::Eligible { image, age_days } => write!(f, "{} is {} days old.", image, age_days),
            Self::Retained { image, age_days } => {
                write!(f, "{} is {} days old, keeping it.", image, age_days)
            }
            Self::CandidatesCounted { count, dry_run: true } => {
                write!(f, "Number of images eligible for deletion: {}", count)
            }
            Self::CandidatesCounted { count, dry_run: false } => {
                write!(f, "Number of images to be deleted: {}", count)
            }
            Self::Deleting { image } => write!(f, "Deleting image: {}", image),
            Self::Deleted { image } => write!(f, "Successfully deleted image: {}", image),
            Self::DeletedTotal { count } => write!(f, "Number of images deleted: {}", count),
            Self::Failed { message } => write!(f, "{}", message),
        }
    }
}

/// Receiver of run events.
pub trait Reporter: Send + Sync {
    fn report(&self, event: CleanupEvent);
}

/// Forwards events to `tracing` at their own severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: CleanupEvent) {
        match event.level() {
            Level::ERROR => tracing::error!("{}", event),
            Level::WARN => tracing::warn!("{}", event),
            Level::DEBUG => tracing::debug!("{}", event),
            Level::TRACE => tracing::trace!("{}", event),
            _ => tracing::info!("{}", event),
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<CleanupEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<CleanupEvent> {
        self.events.lock().clone()
    }

    /// Rendered messages at the given level.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level() == level)
            .map(|e| e.to_string())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: CleanupEvent) {
        self.events.lock().push(event);
    }
}

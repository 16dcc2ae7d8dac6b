//! Retention evaluation: decides which manifests are old enough to delete.

use chrono::{DateTime, Utc};

use crate::manifest::Manifest;

/// Default retention threshold in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Retention policy applied to every manifest in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Images at least this many days old are eligible for deletion.
    pub threshold_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            threshold_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl RetentionPolicy {
    pub fn new(threshold_days: u32) -> Self {
        Self { threshold_days }
    }

    /// Whole days elapsed between `timestamp` and `now`, rounded down.
    pub fn age_days(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> i64 {
        (now - timestamp).num_seconds().div_euclid(SECONDS_PER_DAY)
    }

    /// Whether an image of the given age should be deleted.
    pub fn is_eligible(&self, age_days: i64) -> bool {
        age_days >= i64::from(self.threshold_days)
    }

    /// Classify a single manifest.
    pub fn evaluate(&self, repository: &str, manifest: &Manifest, now: DateTime<Utc>) -> Evaluation {
        let age_days = Self::age_days(now, manifest.timestamp);
        let candidate = DeletionCandidate {
            repository: repository.to_string(),
            digest: manifest.digest.clone(),
            age_days,
        };
        if self.is_eligible(age_days) {
            Evaluation::Eligible(candidate)
        } else {
            Evaluation::Retained(candidate)
        }
    }
}

/// Outcome of evaluating one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Eligible(DeletionCandidate),
    Retained(DeletionCandidate),
}

/// A manifest old enough to be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionCandidate {
    pub repository: String,
    pub digest: String,
    pub age_days: i64,
}

impl DeletionCandidate {
    /// `repo@digest`, the form the registry's delete operation expects.
    pub fn qualified_id(&self) -> String {
        format!("{}@{}", self.repository, self.digest)
    }
}

impl std::fmt::Display for DeletionCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.repository, self.digest)
    }
}

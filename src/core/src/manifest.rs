//! Repository and manifest listings.
//!
//! The registry reports repositories as tab/newline separated text and
//! manifests as a JSON array ordered newest-first. Both are parsed here into
//! owned values that stay immutable for the rest of the run.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{CleanupError, Result};

/// One stored image within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Content digest, e.g. `sha256:...`.
    pub digest: String,

    /// Creation time, normalized to UTC.
    #[serde(deserialize_with = "deserialize_utc")]
    pub timestamp: DateTime<Utc>,

    /// Tags pointing at this manifest, if the listing includes them.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
}

impl Manifest {
    /// Qualified image id within a repository: `repo@digest`.
    pub fn qualified_id(&self, repository: &str) -> String {
        format!("{}@{}", repository, self.digest)
    }
}

/// Parse a repository listing (one name per line).
pub fn parse_repository_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a manifest listing. An empty array (or empty output) yields no manifests.
pub fn parse_manifest_listing(output: &str) -> Result<Vec<Manifest>> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(output).map_err(|e| CleanupError::ManifestParse(e.to_string()))
}

/// Parse a registry timestamp into UTC.
///
/// Accepts RFC 3339 with any offset. Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| CleanupError::ManifestParse(format!("invalid timestamp '{}': {}", raw, e)))
}

fn deserialize_utc<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

//! RegistryClient - Trait for the cloud/registry backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::manifest::Manifest;

/// Operations the cleanup pipeline needs from the registry tooling.
///
/// Every call either succeeds or fails with the backend's error text; the
/// pipeline stops at the first failure.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Authenticate to the cloud account.
    async fn login_identity(&self) -> Result<()>;

    /// Authenticate to the named registry.
    async fn login_registry(&self, registry: &str) -> Result<()>;

    /// List all repositories in the registry.
    async fn list_repositories(&self, registry: &str) -> Result<Vec<String>>;

    /// List the manifests of one repository, newest first.
    async fn list_manifests(&self, registry: &str, repository: &str) -> Result<Vec<Manifest>>;

    /// Delete one image, identified as `repo@digest`.
    async fn delete_image(&self, registry: &str, image: &str) -> Result<()>;
}

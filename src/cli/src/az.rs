//! Registry client backed by the Azure CLI (`az`).
//!
//! Each operation is one blocking `az` invocation. A non-zero exit status
//! becomes a [`CleanupError::ExternalOperation`] carrying the captured stderr.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use acr_cleanup_core::error::{CleanupError, Result};
use acr_cleanup_core::manifest::{parse_manifest_listing, parse_repository_listing, Manifest};
use acr_cleanup_core::RegistryClient;
use async_trait::async_trait;
use tokio::process::Command;

/// Azure Container Registry client that shells out to `az`.
#[derive(Debug, Clone)]
pub struct AzCliClient {
    program: PathBuf,
}

impl AzCliClient {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn az(&self, args: &[&str]) -> Result<String> {
        run_command(&self.program, args).await
    }
}

impl Default for AzCliClient {
    fn default() -> Self {
        Self::new(acr_cleanup_core::config::DEFAULT_AZ_PATH)
    }
}

#[async_trait]
impl RegistryClient for AzCliClient {
    async fn login_identity(&self) -> Result<()> {
        self.az(&["login", "--identity"]).await.map(|_| ())
    }

    async fn login_registry(&self, registry: &str) -> Result<()> {
        self.az(&["acr", "login", "-n", registry]).await.map(|_| ())
    }

    async fn list_repositories(&self, registry: &str) -> Result<Vec<String>> {
        let output = self
            .az(&["acr", "repository", "list", "-n", registry, "-o", "tsv"])
            .await?;
        Ok(parse_repository_listing(&output))
    }

    async fn list_manifests(&self, registry: &str, repository: &str) -> Result<Vec<Manifest>> {
        let output = self
            .az(&[
                "acr",
                "repository",
                "show-manifests",
                "-n",
                registry,
                "--repository",
                repository,
                "--orderby",
                "time_desc",
                "-o",
                "json",
            ])
            .await?;
        parse_manifest_listing(&output)
    }

    async fn delete_image(&self, registry: &str, image: &str) -> Result<()> {
        self.az(&[
            "acr", "repository", "delete", "-n", registry, "--image", image, "--yes",
        ])
        .await
        .map(|_| ())
    }
}

/// Run an external command to completion and return its stdout.
///
/// Stdin is closed so a prompting tool fails instead of hanging.
pub async fn run_command(program: &Path, args: &[&str]) -> Result<String> {
    let operation = describe(program, args);
    tracing::debug!("Running: {}", operation);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CleanupError::Spawn {
            operation: operation.clone(),
            message: e.to_string(),
        })?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.trim().is_empty() {
        Err(CleanupError::external(
            operation,
            format!("exited with {}", output.status),
        ))
    } else {
        Err(CleanupError::external(operation, stderr))
    }
}

fn describe(program: &Path, args: &[&str]) -> String {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());
    std::iter::once(name)
        .chain(args.iter().map(|a| a.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_describe_uses_file_name() {
        let desc = describe(Path::new("/usr/local/bin/az"), &["acr", "login", "-n", "r"]);
        assert_eq!(desc, "az acr login -n r");
    }

    #[tokio::test]
    async fn test_run_command_captures_stdout() {
        let out = run_command(Path::new("sh"), &["-c", "printf 'app\\nworker\\n'"])
            .await
            .unwrap();
        assert_eq!(out, "app\nworker\n");
    }

    #[tokio::test]
    async fn test_run_command_failure_carries_stderr() {
        let err = run_command(Path::new("sh"), &["-c", "echo 'ERROR: denied' >&2; exit 3"])
            .await
            .unwrap_err();
        match err {
            CleanupError::ExternalOperation { operation, message } => {
                assert!(operation.starts_with("sh -c"));
                assert_eq!(message, "ERROR: denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_command_failure_without_stderr() {
        let err = run_command(Path::new("sh"), &["-c", "exit 2"]).await.unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[tokio::test]
    async fn test_run_command_missing_program() {
        let err = run_command(Path::new("/nonexistent/az-cleanup-test"), &["login"])
            .await
            .unwrap_err();
        assert!(matches!(err, CleanupError::Spawn { .. }));
    }

    // `echo` stands in for `az` so the argument vector comes back as output.

    #[tokio::test]
    async fn test_list_repositories_arguments() {
        let client = AzCliClient::new("echo");
        let repos = client.list_repositories("myacr").await.unwrap();
        assert_eq!(repos, vec!["acr repository list -n myacr -o tsv"]);
    }

    #[tokio::test]
    async fn test_login_succeeds_on_zero_exit() {
        let client = AzCliClient::new("echo");
        client.login_identity().await.unwrap();
        client.login_registry("myacr").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_manifests_rejects_non_json_output() {
        let client = AzCliClient::new("echo");
        let err = client.list_manifests("myacr", "app").await.unwrap_err();
        assert!(matches!(err, CleanupError::ManifestParse(_)));
    }

    #[tokio::test]
    async fn test_delete_failure_is_external_operation() {
        let client = AzCliClient::new("false");
        let err = client
            .delete_image("myacr", "app@sha256:a")
            .await
            .unwrap_err();
        match err {
            CleanupError::ExternalOperation { operation, .. } => {
                assert_eq!(
                    operation,
                    "false acr repository delete -n myacr --image app@sha256:a --yes"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_program_is_az() {
        assert_eq!(AzCliClient::default().program(), Path::new("az"));
    }
}

//! Cleanup pipeline.
//!
//! Runs the fixed sequence: identity login, registry login, repository
//! listing, manifest listing and retention evaluation per repository, and
//! finally deletion of every candidate (skipped in dry-run mode). The first
//! failing external operation ends the run; nothing after it executes.

use std::pin::pin;

use chrono::{DateTime, Utc};
use futures::{stream, StreamExt, TryStreamExt};

use crate::client::RegistryClient;
use crate::config::CleanupConfig;
use crate::error::Result;
use crate::event::{CleanupEvent, Reporter};
use crate::retention::{DeletionCandidate, Evaluation};

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub dry_run: bool,
    /// Repositories enumerated.
    pub repositories: usize,
    /// Manifests evaluated across all repositories.
    pub manifests_scanned: usize,
    /// Eligible images, in collection order.
    pub candidates: Vec<DeletionCandidate>,
    /// Images actually deleted. Always zero in dry-run mode.
    pub deleted: usize,
}

impl RunSummary {
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

/// Drives one cleanup run against a registry client.
pub struct CleanupPipeline<'a> {
    client: &'a dyn RegistryClient,
    reporter: &'a dyn Reporter,
    config: CleanupConfig,
}

impl<'a> CleanupPipeline<'a> {
    pub fn new(
        client: &'a dyn RegistryClient,
        reporter: &'a dyn Reporter,
        config: CleanupConfig,
    ) -> Self {
        Self {
            client,
            reporter,
            config,
        }
    }

    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Run with the current wall-clock time as the reference for image age.
    pub async fn run(&self) -> Result<RunSummary> {
        self.run_at(Utc::now()).await
    }

    /// Run with an explicit reference time.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        let result = self.execute(now).await;
        if let Err(e) = &result {
            self.reporter.report(CleanupEvent::Failed {
                message: e.to_string(),
            });
        }
        result
    }

    async fn execute(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        self.config.validate()?;

        let dry_run = self.config.dry_run;
        if dry_run {
            self.reporter.report(CleanupEvent::DryRun);
        }

        self.authenticate().await?;

        let registry = self.config.registry.as_str();
        self.reporter.report(CleanupEvent::RepositoriesFetching {
            registry: registry.to_string(),
        });
        let repositories = self.client.list_repositories(registry).await?;
        self.reporter.report(CleanupEvent::RepositoriesFetched {
            registry: registry.to_string(),
        });
        self.reporter.report(CleanupEvent::RepositoriesListed {
            registry: registry.to_string(),
            count: repositories.len(),
        });

        self.reporter.report(CleanupEvent::CheckingManifests);
        let (candidates, manifests_scanned) = self.collect_candidates(&repositories, now).await?;
        self.reporter.report(CleanupEvent::CandidatesCounted {
            count: candidates.len(),
            dry_run,
        });

        let deleted = if dry_run {
            0
        } else {
            let deleted = self.delete_candidates(&candidates).await?;
            self.reporter
                .report(CleanupEvent::DeletedTotal { count: deleted });
            deleted
        };

        Ok(RunSummary {
            dry_run,
            repositories: repositories.len(),
            manifests_scanned,
            candidates,
            deleted,
        })
    }

    async fn authenticate(&self) -> Result<()> {
        let registry = self.config.registry.as_str();

        self.reporter.report(CleanupEvent::IdentityLoginStarted);
        self.client.login_identity().await?;
        self.reporter.report(CleanupEvent::IdentityLoginSucceeded);

        self.reporter.report(CleanupEvent::RegistryLoginStarted {
            registry: registry.to_string(),
        });
        self.client.login_registry(registry).await?;
        self.reporter.report(CleanupEvent::RegistryLoginSucceeded {
            registry: registry.to_string(),
        });
        Ok(())
    }

    /// List and evaluate manifests for every repository.
    ///
    /// Up to `concurrency` listings may be in flight, but results are
    /// consumed in repository order and the first failure stops the stream.
    async fn collect_candidates(
        &self,
        repositories: &[String],
        now: DateTime<Utc>,
    ) -> Result<(Vec<DeletionCandidate>, usize)> {
        let client = self.client;
        let registry = self.config.registry.as_str();
        let policy = self.config.retention;

        let mut listings = pin!(stream::iter(repositories)
            .map(|repository| async move {
                client
                    .list_manifests(registry, repository)
                    .await
                    .map(|manifests| (repository, manifests))
            })
            .buffered(self.config.concurrency));

        let mut candidates = Vec::new();
        let mut scanned = 0;

        while let Some((repository, manifests)) = listings.try_next().await? {
            self.reporter.report(CleanupEvent::ManifestsPulled {
                repository: repository.clone(),
            });
            self.reporter.report(CleanupEvent::ManifestsListed {
                repository: repository.clone(),
                count: manifests.len(),
            });
            scanned += manifests.len();

            for manifest in &manifests {
                match policy.evaluate(repository, manifest, now) {
                    Evaluation::Eligible(candidate) => {
                        self.reporter.report(CleanupEvent::Eligible {
                            image: candidate.qualified_id(),
                            age_days: candidate.age_days,
                        });
                        candidates.push(candidate);
                    }
                    Evaluation::Retained(kept) => {
                        self.reporter.report(CleanupEvent::Retained {
                            image: kept.qualified_id(),
                            age_days: kept.age_days,
                        });
                    }
                }
            }
        }

        Ok((candidates, scanned))
    }

    async fn delete_candidates(&self, candidates: &[DeletionCandidate]) -> Result<usize> {
        let registry = self.config.registry.as_str();
        let mut deleted = 0;

        for candidate in candidates {
            let image = candidate.qualified_id();
            self.reporter.report(CleanupEvent::Deleting {
                image: image.clone(),
            });
            self.client.delete_image(registry, &image).await?;
            deleted += 1;
            self.reporter.report(CleanupEvent::Deleted { image });
        }

        Ok(deleted)
    }
}

//! The registry sweeper.
//!
//! Drives the per-repository pipeline: discover images, classify them by
//! branch, evaluate retention, aggregate the delete set, submit (or
//! simulate) size-bounded delete batches, and report.
//!
//! Repositories are processed strictly one at a time and share no state; a
//! region or repository that fails to enumerate is recorded in the run
//! summary and the sweep continues with the next unit.

use tracing::{info, warn};

use lethe_core::batch::chunked;
use lethe_core::{
    evaluate_repository, BranchPolicy, RepositoryContext, RetentionConfig, TagRecord,
};

use crate::api::RegistryApi;
use crate::error::RegistryError;

/// Outcome of one delete chunk.
#[derive(Debug, Clone)]
pub enum ChunkOutcome {
    /// Dry run: no request was issued.
    Simulated,

    /// The bulk-delete call was accepted.
    Deleted {
        /// Digests the registry confirmed deleted.
        deleted: usize,
        /// Per-digest failures inside the accepted call.
        failures: usize,
    },

    /// The bulk-delete call itself failed. Later chunks still ran.
    Failed {
        /// Error message.
        message: String,
    },
}

/// One submitted (or simulated) delete chunk.
#[derive(Debug, Clone)]
pub struct ChunkReport {
    /// 1-based chunk index within the repository's delete set.
    pub index: usize,

    /// Digests in this chunk, in discovery order.
    pub digests: Vec<String>,

    /// What happened to the chunk.
    pub outcome: ChunkOutcome,
}

/// Result of sweeping one repository.
#[derive(Debug, Clone)]
pub struct RepositoryReport {
    /// The repository that was evaluated.
    pub repository: RepositoryContext,

    /// Total images in the listing.
    pub images_found: usize,

    /// Images carrying no tags at all.
    pub untagged_found: usize,

    /// Delete chunks, in submission order. Empty when nothing was eligible.
    pub chunks: Vec<ChunkReport>,

    /// Tag-level audit records for every tag that triggered a deletion.
    /// Always complete, independent of per-chunk outcomes.
    pub tag_records: Vec<TagRecord>,

    /// Image-listing error, if enumeration failed for this repository.
    pub error: Option<String>,
}

impl RepositoryReport {
    /// Number of digests marked for deletion.
    #[must_use]
    pub fn marked(&self) -> usize {
        self.chunks.iter().map(|c| c.digests.len()).sum()
    }

    /// Returns true if this repository failed or had a failing chunk.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.error.is_some()
            || self.chunks.iter().any(|c| {
                matches!(
                    c.outcome,
                    ChunkOutcome::Failed { .. } | ChunkOutcome::Deleted { failures: 1.., .. }
                )
            })
    }
}

/// Result of sweeping one region.
#[derive(Debug, Clone)]
pub struct RegionReport {
    /// Region name.
    pub region: String,

    /// Per-repository reports, in enumeration order.
    pub repositories: Vec<RepositoryReport>,

    /// Repository-listing error, if enumeration failed for this region.
    pub error: Option<String>,
}

/// Result of one full sweep invocation.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-region reports.
    pub regions: Vec<RegionReport>,
}

impl RunSummary {
    /// Total repositories evaluated (including failed ones).
    #[must_use]
    pub fn repositories(&self) -> usize {
        self.regions.iter().map(|r| r.repositories.len()).sum()
    }

    /// Total digests marked for deletion across the run.
    #[must_use]
    pub fn marked(&self) -> usize {
        self.regions
            .iter()
            .flat_map(|r| &r.repositories)
            .map(RepositoryReport::marked)
            .sum()
    }

    /// Returns true if any region, repository, or chunk failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.regions.iter().any(|region| {
            region.error.is_some()
                || region
                    .repositories
                    .iter()
                    .any(RepositoryReport::has_failures)
        })
    }
}

/// Sweeps every repository in the configured region scope.
///
/// When `config.region` is `None`, all available regions are enumerated.
/// Enumeration failures below the region-listing level are scoped: they are
/// recorded in the returned summary and the sweep continues.
///
/// # Errors
///
/// Returns an error only when the region listing itself fails; with no
/// regions there is nothing to continue with.
pub async fn sweep<C: RegistryApi + ?Sized>(
    client: &C,
    policies: &[BranchPolicy],
    config: &RetentionConfig,
) -> Result<RunSummary, RegistryError> {
    let regions = match &config.region {
        Some(region) => vec![region.clone()],
        None => client.list_regions().await?,
    };

    let mut summary = RunSummary::default();
    for region in regions {
        info!(%region, "Discovering images");
        summary
            .regions
            .push(sweep_region(client, &region, policies, config).await);
    }

    Ok(summary)
}

/// Sweeps one region, isolating its enumeration failures.
async fn sweep_region<C: RegistryApi + ?Sized>(
    client: &C,
    region: &str,
    policies: &[BranchPolicy],
    config: &RetentionConfig,
) -> RegionReport {
    let repositories = match client.list_repositories(region).await {
        Ok(repositories) => repositories,
        Err(e) => {
            warn!(%region, error = %e, "Skipping region");
            return RegionReport {
                region: region.to_string(),
                repositories: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    let mut reports = Vec::with_capacity(repositories.len());
    for repository in repositories {
        reports.push(sweep_repository(client, region, repository, policies, config).await);
    }

    RegionReport {
        region: region.to_string(),
        repositories: reports,
        error: None,
    }
}

/// Runs the full pipeline for one repository:
/// Discover -> Classify -> Evaluate -> Aggregate -> Batch & Submit -> Report.
async fn sweep_repository<C: RegistryApi + ?Sized>(
    client: &C,
    region: &str,
    repository: RepositoryContext,
    policies: &[BranchPolicy],
    config: &RetentionConfig,
) -> RepositoryReport {
    info!(repository = %repository.repository_uri, "Starting repository");

    let images = match client.list_images(region, &repository).await {
        Ok(images) => images,
        Err(e) => {
            warn!(repository = %repository.repository_name, error = %e, "Skipping repository");
            return RepositoryReport {
                repository,
                images_found: 0,
                untagged_found: 0,
                chunks: Vec::new(),
                tag_records: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    let untagged_found = images.iter().filter(|i| i.is_untagged()).count();
    let decision = evaluate_repository(&images, policies, config, &repository);

    info!(
        repository = %repository.repository_name,
        found = images.len(),
        untagged = untagged_found,
        marked = decision.len(),
        "Evaluated repository"
    );

    if decision.is_empty() {
        info!(repository = %repository.repository_name, "Nothing to delete");
    }

    let mut chunks = Vec::new();
    for (position, chunk) in chunked(decision.delete_digests()).enumerate() {
        let index = position + 1;
        let outcome = if config.dry_run {
            info!(
                repository = %repository.repository_name,
                chunk = index,
                size = chunk.len(),
                "Dry run, would delete chunk"
            );
            ChunkOutcome::Simulated
        } else {
            match client.batch_delete(region, &repository, chunk).await {
                Ok(result) => {
                    if !result.is_complete() {
                        warn!(
                            repository = %repository.repository_name,
                            chunk = index,
                            failures = result.failures.len(),
                            "Chunk partially deleted"
                        );
                    }
                    ChunkOutcome::Deleted {
                        deleted: result.deleted.len(),
                        failures: result.failures.len(),
                    }
                }
                // No retry here; a failed chunk must not block the rest.
                Err(e) => {
                    warn!(
                        repository = %repository.repository_name,
                        chunk = index,
                        error = %e,
                        "Chunk delete failed"
                    );
                    ChunkOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            }
        };
        chunks.push(ChunkReport {
            index,
            digests: chunk.to_vec(),
            outcome,
        });
    }

    RepositoryReport {
        repository,
        images_found: images.len(),
        untagged_found,
        chunks,
        tag_records: decision.tag_records().to_vec(),
        error: None,
    }
}

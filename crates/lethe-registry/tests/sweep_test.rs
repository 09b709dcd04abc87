//! Integration tests for the sweeper against an in-memory registry fake.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use lethe_core::{tracked_branches, ImageRecord, RepositoryContext, RetentionConfig};
use lethe_registry::{
    sweep, BatchDeleteResult, ChunkOutcome, DeleteFailure, RegistryApi, RegistryError,
};

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn repo(name: &str) -> RepositoryContext {
    RepositoryContext::new("123456789", name, format!("registry.example.com/{name}"))
}

fn untagged_listing(n: usize) -> Vec<ImageRecord> {
    (0..n)
        .map(|i| ImageRecord::untagged(format!("sha256:{i:04}"), ts(i as i64)))
        .collect()
}

/// In-memory registry standing in for the HTTP client.
#[derive(Default)]
struct FakeRegistry {
    regions: Vec<String>,
    repositories: HashMap<String, Vec<RepositoryContext>>,
    images: HashMap<String, Vec<ImageRecord>>,
    fail_repository_listing: HashSet<String>,
    fail_image_listing: HashSet<String>,
    fail_delete_for: HashSet<String>,
    refuse_digests: HashSet<String>,
    region_listings: Mutex<usize>,
    deletes: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRegistry {
    fn single_region(repos: Vec<(&str, Vec<ImageRecord>)>) -> Self {
        let mut registry = Self {
            regions: vec!["eu-west-1".to_string()],
            ..Self::default()
        };
        let contexts = repos.iter().map(|(name, _)| repo(name)).collect();
        registry
            .repositories
            .insert("eu-west-1".to_string(), contexts);
        for (name, images) in repos {
            registry.images.insert(name.to_string(), images);
        }
        registry
    }

    fn deletes(&self) -> Vec<(String, Vec<String>)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryApi for FakeRegistry {
    async fn list_regions(&self) -> Result<Vec<String>, RegistryError> {
        *self.region_listings.lock().unwrap() += 1;
        Ok(self.regions.clone())
    }

    async fn list_repositories(
        &self,
        region: &str,
    ) -> Result<Vec<RepositoryContext>, RegistryError> {
        if self.fail_repository_listing.contains(region) {
            return Err(RegistryError::RepositoryListingFailed {
                region: region.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(self.repositories.get(region).cloned().unwrap_or_default())
    }

    async fn list_images(
        &self,
        _region: &str,
        repo: &RepositoryContext,
    ) -> Result<Vec<ImageRecord>, RegistryError> {
        if self.fail_image_listing.contains(&repo.repository_name) {
            return Err(RegistryError::ImageListingFailed {
                repository: repo.repository_name.clone(),
                message: "injected failure".to_string(),
            });
        }
        Ok(self
            .images
            .get(&repo.repository_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn batch_delete(
        &self,
        _region: &str,
        repo: &RepositoryContext,
        digests: &[String],
    ) -> Result<BatchDeleteResult, RegistryError> {
        if self.fail_delete_for.contains(&repo.repository_name) {
            return Err(RegistryError::DeleteFailed {
                repository: repo.repository_name.clone(),
                message: "injected failure".to_string(),
            });
        }
        self.deletes
            .lock()
            .unwrap()
            .push((repo.repository_name.clone(), digests.to_vec()));
        let (refused, deleted): (Vec<String>, Vec<String>) = digests
            .iter()
            .cloned()
            .partition(|d| self.refuse_digests.contains(d));
        Ok(BatchDeleteResult {
            deleted,
            failures: refused
                .into_iter()
                .map(|image_digest| DeleteFailure {
                    image_digest,
                    failure_code: "ImageReferencedByManifestList".to_string(),
                    failure_reason: "still referenced".to_string(),
                })
                .collect(),
        })
    }
}

fn config(dry_run: bool) -> RetentionConfig {
    RetentionConfig::new(None, dry_run, 100, "^$").unwrap()
}

#[tokio::test]
async fn dry_run_reports_chunks_without_deleting() {
    let registry = FakeRegistry::single_region(vec![("api", untagged_listing(250))]);
    let config = config(true);
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    assert!(registry.deletes().is_empty());
    assert!(!summary.has_failures());
    assert_eq!(summary.marked(), 250);

    let report = &summary.regions[0].repositories[0];
    let sizes: Vec<usize> = report.chunks.iter().map(|c| c.digests.len()).collect();
    assert_eq!(sizes, [100, 100, 50]);
    for chunk in &report.chunks {
        assert!(matches!(chunk.outcome, ChunkOutcome::Simulated));
    }
}

#[tokio::test]
async fn live_run_submits_the_same_chunks_as_dry_run() {
    let listing = untagged_listing(250);
    let dry_registry = FakeRegistry::single_region(vec![("api", listing.clone())]);
    let live_registry = FakeRegistry::single_region(vec![("api", listing)]);
    let dry_config = config(true);
    let live_config = config(false);
    let policies = tracked_branches(&dry_config).unwrap();

    let dry = sweep(&dry_registry, &policies, &dry_config).await.unwrap();
    let live = sweep(&live_registry, &policies, &live_config).await.unwrap();

    let dry_chunks: Vec<Vec<String>> = dry.regions[0].repositories[0]
        .chunks
        .iter()
        .map(|c| c.digests.clone())
        .collect();
    let submitted: Vec<Vec<String>> = live_registry
        .deletes()
        .into_iter()
        .map(|(_, digests)| digests)
        .collect();

    // Identical boundaries and digests; only the destructive call differs.
    assert_eq!(dry_chunks, submitted);
    assert_eq!(submitted[0][0], "sha256:0000");
    assert_eq!(submitted[1][0], "sha256:0100");
    assert_eq!(submitted[2].len(), 50);
}

#[tokio::test]
async fn empty_delete_set_is_a_noop() {
    let images = vec![ImageRecord::new("sha256:aa", vec!["master-1".to_string()], ts(1))];
    let registry = FakeRegistry::single_region(vec![("api", images)]);
    let config = config(false);
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    assert!(registry.deletes().is_empty());
    let report = &summary.regions[0].repositories[0];
    assert_eq!(report.images_found, 1);
    assert!(report.chunks.is_empty());
    assert!(report.tag_records.is_empty());
}

#[tokio::test]
async fn failing_repository_does_not_block_the_next() {
    let mut registry = FakeRegistry::single_region(vec![
        ("broken", Vec::new()),
        ("api", untagged_listing(3)),
    ]);
    registry.fail_image_listing.insert("broken".to_string());
    let config = config(false);
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    assert!(summary.has_failures());
    let reports = &summary.regions[0].repositories;
    assert_eq!(reports.len(), 2);
    assert!(reports[0].error.is_some());
    assert!(reports[1].error.is_none());
    assert_eq!(reports[1].marked(), 3);
    assert_eq!(registry.deletes().len(), 1);
}

#[tokio::test]
async fn failing_delete_is_scoped_to_its_repository() {
    let mut registry = FakeRegistry::single_region(vec![
        ("flaky", untagged_listing(5)),
        ("api", untagged_listing(2)),
    ]);
    registry.fail_delete_for.insert("flaky".to_string());
    let config = config(false);
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    assert!(summary.has_failures());
    let reports = &summary.regions[0].repositories;
    assert!(matches!(
        reports[0].chunks[0].outcome,
        ChunkOutcome::Failed { .. }
    ));
    // The healthy repository still had its chunk submitted.
    let deletes = registry.deletes();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].0, "api");
}

#[tokio::test]
async fn failing_region_does_not_block_the_next() {
    let mut registry = FakeRegistry {
        regions: vec!["eu-west-1".to_string(), "us-east-1".to_string()],
        ..FakeRegistry::default()
    };
    registry.fail_repository_listing.insert("eu-west-1".to_string());
    registry
        .repositories
        .insert("us-east-1".to_string(), vec![repo("api")]);
    registry
        .images
        .insert("api".to_string(), untagged_listing(1));
    let config = config(true);
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    assert!(summary.has_failures());
    assert_eq!(summary.regions.len(), 2);
    assert!(summary.regions[0].error.is_some());
    assert!(summary.regions[1].error.is_none());
    assert_eq!(summary.regions[1].repositories[0].marked(), 1);
}

#[tokio::test]
async fn region_scope_skips_region_enumeration() {
    let registry = FakeRegistry::single_region(vec![("api", untagged_listing(1))]);
    let config = RetentionConfig::new(Some("eu-west-1".to_string()), true, 100, "^$").unwrap();
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    assert_eq!(*registry.region_listings.lock().unwrap(), 0);
    assert_eq!(summary.regions.len(), 1);
    assert_eq!(summary.regions[0].region, "eu-west-1");
}

#[tokio::test]
async fn tag_records_are_reported_even_when_a_chunk_fails() {
    let images = vec![
        ImageRecord::new("sha256:new", vec!["master-2".to_string()], ts(2)),
        ImageRecord::new("sha256:old", vec!["master-1".to_string()], ts(1)),
    ];
    let mut registry = FakeRegistry::single_region(vec![("api", images)]);
    registry.fail_delete_for.insert("api".to_string());
    let config = RetentionConfig::new(None, false, 1, "^$").unwrap();
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    let report = &summary.regions[0].repositories[0];
    assert!(report.has_failures());
    assert_eq!(report.tag_records.len(), 1);
    assert_eq!(
        report.tag_records[0].image_url,
        "registry.example.com/api:master-1"
    );
}

#[tokio::test]
async fn partial_chunk_failure_is_surfaced() {
    let mut registry = FakeRegistry::single_region(vec![("api", untagged_listing(3))]);
    registry.refuse_digests.insert("sha256:0001".to_string());
    let config = config(false);
    let policies = tracked_branches(&config).unwrap();

    let summary = sweep(&registry, &policies, &config).await.unwrap();

    let report = &summary.regions[0].repositories[0];
    assert!(matches!(
        report.chunks[0].outcome,
        ChunkOutcome::Deleted {
            deleted: 2,
            failures: 1
        }
    ));
    assert!(summary.has_failures());
}

//! Registry collaborator contract and wire types.
//!
//! The sweeper drives everything through the [`RegistryApi`] trait so the
//! per-repository pipeline can be exercised against an in-memory fake in
//! tests, with the HTTP client as the production implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lethe_core::{ImageRecord, RepositoryContext};

use crate::error::RegistryError;

/// Enumeration and bulk-delete operations the sweeper consumes.
///
/// Listing calls drain pagination internally and return complete listings.
/// `batch_delete` submits at most [`lethe_core::batch::MAX_IMAGES_PER_DELETE`]
/// digests per call; the sweeper is responsible for chunking.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Lists all available regions.
    async fn list_regions(&self) -> Result<Vec<String>, RegistryError>;

    /// Lists every repository in a region.
    async fn list_repositories(
        &self,
        region: &str,
    ) -> Result<Vec<RepositoryContext>, RegistryError>;

    /// Lists every image in a repository.
    ///
    /// Each digest appears at most once in the returned listing.
    async fn list_images(
        &self,
        region: &str,
        repo: &RepositoryContext,
    ) -> Result<Vec<ImageRecord>, RegistryError>;

    /// Deletes up to 100 images by digest in one bulk call.
    async fn batch_delete(
        &self,
        region: &str,
        repo: &RepositoryContext,
        digests: &[String],
    ) -> Result<BatchDeleteResult, RegistryError>;
}

/// Result of one bulk-delete call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteResult {
    /// Digests the registry confirmed deleted.
    #[serde(default)]
    pub deleted: Vec<String>,

    /// Per-digest failures within an otherwise accepted call.
    #[serde(default)]
    pub failures: Vec<DeleteFailure>,
}

impl BatchDeleteResult {
    /// Returns true if every requested digest was deleted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One digest the registry refused to delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFailure {
    /// The digest that failed.
    pub image_digest: String,

    /// Machine-readable failure code.
    pub failure_code: String,

    /// Human-readable failure reason.
    pub failure_reason: String,
}

/// Wire envelope for the region listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegionList {
    #[serde(default)]
    pub regions: Vec<String>,
}

/// Wire envelope for one page of the repository listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryPage {
    #[serde(default)]
    pub repositories: Vec<RepositoryContext>,
    pub next_token: Option<String>,
}

/// Wire envelope for one page of the image listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImagePage {
    #[serde(default)]
    pub image_details: Vec<ImageRecord>,
    pub next_token: Option<String>,
}

/// Wire request body for a bulk-delete call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchDeleteRequest<'a> {
    pub registry_id: &'a str,
    pub image_digests: &'a [String],
}

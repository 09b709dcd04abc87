//! Image and repository models.
//!
//! This module defines the [`ImageRecord`] structure describing one image
//! version in a repository listing, together with the [`RepositoryContext`]
//! identifying where the image lives and the [`TagRecord`] audit pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One image version and its metadata, as returned by a repository listing.
///
/// A digest appears at most once in a repository's listing per evaluation
/// pass; uniqueness is guaranteed by the API layer, not re-checked here.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use lethe_core::ImageRecord;
///
/// let image = ImageRecord::new("sha256:ab12", vec!["master-44".into()], Utc::now());
/// assert!(!image.is_untagged());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Opaque content identifier, unique per image version within a repository.
    #[serde(rename = "imageDigest")]
    pub digest: String,

    /// Human-readable labels attached to this digest. May be empty.
    #[serde(rename = "imageTags", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// When the image was pushed.
    #[serde(rename = "imagePushedAt")]
    pub pushed_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Creates a new image record.
    #[must_use]
    pub fn new(digest: impl Into<String>, tags: Vec<String>, pushed_at: DateTime<Utc>) -> Self {
        Self {
            digest: digest.into(),
            tags,
            pushed_at,
        }
    }

    /// Creates an image record carrying no tags.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use lethe_core::ImageRecord;
    ///
    /// let image = ImageRecord::untagged("sha256:cd34", Utc::now());
    /// assert!(image.is_untagged());
    /// ```
    #[must_use]
    pub fn untagged(digest: impl Into<String>, pushed_at: DateTime<Utc>) -> Self {
        Self::new(digest, Vec::new(), pushed_at)
    }

    /// Returns true if this image carries no tags at all.
    ///
    /// Untagged images are deletion candidates regardless of any branch
    /// policy.
    #[must_use]
    pub fn is_untagged(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Identifies the repository an evaluation pass targets.
///
/// Owned transiently for the duration of one repository's evaluation; never
/// persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryContext {
    /// Registry identifier the repository belongs to.
    pub registry_id: String,

    /// Repository name, used for listing and delete calls.
    pub repository_name: String,

    /// Full repository URI, used to render tag-qualified image URLs.
    pub repository_uri: String,
}

impl RepositoryContext {
    /// Creates a new repository context.
    #[must_use]
    pub fn new(
        registry_id: impl Into<String>,
        repository_name: impl Into<String>,
        repository_uri: impl Into<String>,
    ) -> Self {
        Self {
            registry_id: registry_id.into(),
            repository_name: repository_name.into(),
            repository_uri: repository_uri.into(),
        }
    }

    /// Returns the tag-qualified image URL for a tag in this repository.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lethe_core::RepositoryContext;
    ///
    /// let repo = RepositoryContext::new("123", "api", "registry.example.com/api");
    /// assert_eq!(repo.image_url("v1.2"), "registry.example.com/api:v1.2");
    /// ```
    #[must_use]
    pub fn image_url(&self, tag: &str) -> String {
        format!("{}:{tag}", self.repository_uri)
    }
}

/// Informational audit pair for one tag that triggered a deletion.
///
/// Purely human-facing; duplicates are removed by full record equality, so
/// two differently-tagged images sharing a digest each contribute their own
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    /// Tag-qualified image URL (`<repository-uri>:<tag>`).
    pub image_url: String,

    /// Push time of the image the tag pointed at.
    pub pushed_at: DateTime<Utc>,
}

impl TagRecord {
    /// Creates a new tag record.
    #[must_use]
    pub fn new(image_url: impl Into<String>, pushed_at: DateTime<Utc>) -> Self {
        Self {
            image_url: image_url.into(),
            pushed_at,
        }
    }
}

//! # Lethe Core
//!
//! Retention decision engine for the Lethe registry sweeper.
//!
//! This crate holds the pure, I/O-free part of the system: the rules that
//! turn a raw, unordered repository listing into a partitioned keep/delete
//! decision, plus the chunk planning that bounds bulk-delete requests.
//!
//! - [`ImageRecord`] / [`RepositoryContext`] - image and repository models
//! - [`BranchPolicy`] / [`tracked_branches`] - per-branch retention policies
//! - [`classify`] - branch membership and the untagged pass
//! - [`evaluate_repository`] - the keep/delete partition
//! - [`batch`] - transport-bounded chunk planning
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use lethe_core::{
//!     evaluate_repository, tracked_branches, ImageRecord, RepositoryContext,
//!     RetentionConfig,
//! };
//!
//! let config = RetentionConfig::default_dry_run();
//! let policies = tracked_branches(&config)?;
//! let repo = RepositoryContext::new("123", "api", "registry.example.com/api");
//!
//! let images = vec![ImageRecord::untagged("sha256:stale", Utc::now())];
//! let decision = evaluate_repository(&images, &policies, &config, &repo);
//! assert_eq!(decision.delete_digests(), ["sha256:stale"]);
//! # Ok::<(), lethe_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod image;
pub mod policy;


pub use classify::{branch_matches, classify, Classification};
pub use config::{RetentionConfig, DEFAULT_IGNORE_TAGS_PATTERN, DEFAULT_IMAGES_TO_KEEP};
pub use error::{Error, Result};
pub use evaluate::{evaluate_branch, evaluate_repository, RetentionDecision, LATEST_TAG};
pub use image::{ImageRecord, RepositoryContext, TagRecord};
pub use policy::{tracked_branches, BranchPolicy, PRIMARY_BRANCH, SECONDARY_BRANCH};

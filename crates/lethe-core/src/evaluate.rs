//! Retention policy evaluation.
//!
//! Turns a classified repository listing into a [`RetentionDecision`]: the
//! insertion-ordered, digest-deduplicated set of images to delete plus the
//! tag-level audit records.

use std::collections::HashSet;

use crate::classify::classify;
use crate::config::RetentionConfig;
use crate::image::{ImageRecord, RepositoryContext, TagRecord};
use crate::policy::BranchPolicy;

/// Tag that is never deleted through a branch pass, wherever it sits in the
/// retention window. Exact match, not substring.
pub const LATEST_TAG: &str = "latest";

/// The keep/delete partition for one repository.
///
/// Constructed fresh per repository, consumed once by the delete batcher,
/// then discarded. The delete set preserves discovery order and holds each
/// digest at most once; tag records dedup by full record equality and may
/// legitimately contain several entries for one digest (one per tag).
#[derive(Debug, Default)]
pub struct RetentionDecision {
    delete_digests: Vec<String>,
    seen_digests: HashSet<String>,
    tag_records: Vec<TagRecord>,
    seen_records: HashSet<TagRecord>,
}

impl RetentionDecision {
    /// Creates an empty decision.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a digest for deletion. Re-marking an already marked digest is
    /// a no-op, so overlapping branch passes and the untagged pass cannot
    /// double-count.
    pub fn mark_digest(&mut self, digest: &str) {
        if self.seen_digests.insert(digest.to_string()) {
            self.delete_digests.push(digest.to_string());
        }
    }

    /// Records an informational tag-level audit entry. Exact duplicates are
    /// dropped.
    pub fn record_tag(&mut self, record: TagRecord) {
        if self.seen_records.insert(record.clone()) {
            self.tag_records.push(record);
        }
    }

    /// Digests marked for deletion, in discovery order.
    #[must_use]
    pub fn delete_digests(&self) -> &[String] {
        &self.delete_digests
    }

    /// Tag-level audit records, in discovery order.
    #[must_use]
    pub fn tag_records(&self) -> &[TagRecord] {
        &self.tag_records
    }

    /// Number of digests marked for deletion.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delete_digests.len()
    }

    /// Returns true if nothing is marked for deletion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delete_digests.is_empty()
    }
}

/// Evaluates one branch's tagged images against its retention policy,
/// accumulating into `decision`.
///
/// Images are stable-sorted descending by push time, so timestamp ties keep
/// their original listing order. The first `keep_count` images in that
/// order are retained unconditionally. Every image past the window is
/// scanned per tag: a tag exactly equal to [`LATEST_TAG`] or matching the
/// configured exemption pattern is skipped; any other tag marks the image's
/// digest for deletion and records an audit entry. An image with a mix of
/// exempt and non-exempt tags still has its digest deleted, since deleting
/// a digest removes all of its tags.
pub fn evaluate_branch(
    images: &[ImageRecord],
    policy: &BranchPolicy,
    config: &RetentionConfig,
    repo: &RepositoryContext,
    decision: &mut RetentionDecision,
) {
    let mut sorted: Vec<&ImageRecord> = images.iter().collect();
    sorted.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));

    // Zero-indexed position in the sorted order; the retention window is
    // position < keep_count.
    for (position, image) in sorted.iter().enumerate() {
        if position < policy.keep_count {
            continue;
        }
        for tag in &image.tags {
            if tag == LATEST_TAG {
                continue;
            }
            if config.is_tag_exempt(tag) {
                continue;
            }
            decision.mark_digest(&image.digest);
            decision.record_tag(TagRecord::new(repo.image_url(tag), image.pushed_at));
        }
    }
}

/// Evaluates a full repository listing: classification, the untagged pass,
/// and each tracked branch's retention pass, aggregated into one decision.
///
/// Evaluating the same immutable listing twice produces an identical
/// decision; there is no hidden state.
#[must_use]
pub fn evaluate_repository(
    images: &[ImageRecord],
    policies: &[BranchPolicy],
    config: &RetentionConfig,
    repo: &RepositoryContext,
) -> RetentionDecision {
    let classification = classify(images, policies);
    let mut decision = RetentionDecision::new();

    for digest in &classification.untagged {
        decision.mark_digest(digest);
    }

    for (branch_images, policy) in classification.branches.iter().zip(policies) {
        evaluate_branch(branch_images, policy, config, repo, &mut decision);
    }

    decision
}

//! Branch classification.
//!
//! Assigns each image of a repository listing to the tracked branches whose
//! patterns its tags match, and collects untagged images into a shared
//! deletion-candidate list.

use regex::Regex;

use crate::image::ImageRecord;
use crate::policy::BranchPolicy;

/// Result of classifying one repository's image listing.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Per tracked branch (same order as the supplied policies), the images
    /// whose tag set matches that branch's pattern. Listing order is
    /// preserved within each branch.
    pub branches: Vec<Vec<ImageRecord>>,

    /// Digests of images carrying no tags at all, in listing order, one
    /// entry per digest. Untagged images are deletion candidates regardless
    /// of branch membership.
    pub untagged: Vec<String>,
}

/// Returns true if a branch pattern matches an image's tag set.
///
/// Membership is a substring search, not a structural match: the pattern
/// matches if it is found anywhere within any tag (unanchored regex search).
/// A pattern `develop` therefore matches `develop-44` as well as
/// `predevelop`.
///
/// # Examples
///
/// ```rust
/// use regex::Regex;
/// use lethe_core::classify::branch_matches;
///
/// let pattern = Regex::new("develop").unwrap();
/// let tags = vec!["develop-20260830".to_string()];
/// assert!(branch_matches(&tags, &pattern));
/// assert!(!branch_matches(&["master-1".to_string()], &pattern));
/// assert!(!branch_matches(&[], &pattern));
/// ```
#[must_use]
pub fn branch_matches(tags: &[String], pattern: &Regex) -> bool {
    tags.iter().any(|tag| pattern.is_match(tag))
}

/// Classifies a repository listing against the tracked branch policies.
///
/// An image may match more than one branch if patterns overlap; it is then
/// independently evaluated under each branch's policy. Overlap is resolved
/// at the digest level by the final deletion set.
#[must_use]
pub fn classify(images: &[ImageRecord], policies: &[BranchPolicy]) -> Classification {
    let mut branches: Vec<Vec<ImageRecord>> = vec![Vec::new(); policies.len()];
    let mut untagged = Vec::new();

    for image in images {
        if image.is_untagged() {
            // A duplicated listing must not double-count a candidate.
            if !untagged.contains(&image.digest) {
                untagged.push(image.digest.clone());
            }
            continue;
        }

        for (slot, policy) in branches.iter_mut().zip(policies) {
            if branch_matches(&image.tags, &policy.pattern) {
                slot.push(image.clone());
            }
        }
    }

    Classification { branches, untagged }
}

//! Branch retention policies.
//!
//! A [`BranchPolicy`] couples a tag pattern deciding branch membership with
//! the number of most-recent tagged images that branch retains.

use regex::Regex;

use crate::config::RetentionConfig;
use crate::error::{Error, Result};

/// Name of the long-lived branch tracked by default.
pub const PRIMARY_BRANCH: &str = "master";

/// Name of the fast-moving branch tracked by default.
pub const SECONDARY_BRANCH: &str = "develop";

/// Fixed keep count for the fast-moving branch.
///
/// Business rule: only the most recent develop build is worth keeping,
/// whatever the configured default. A named constant so it can become
/// configurable later without hunting for an inline special case.
pub const SECONDARY_BRANCH_KEEP_COUNT: usize = 1;

/// Retention policy for one tracked branch.
///
/// # Examples
///
/// ```rust
/// use lethe_core::BranchPolicy;
///
/// let policy = BranchPolicy::new("master", "master", 100)?;
/// assert_eq!(policy.name, "master");
/// assert_eq!(policy.keep_count, 100);
/// # Ok::<(), lethe_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BranchPolicy {
    /// Branch name, used in reporting.
    pub name: String,

    /// Pattern deciding branch membership, matched unanchored against each
    /// tag on an image.
    pub pattern: Regex,

    /// Number of most-recently-pushed tagged images to retain. A branch
    /// with a keep count of zero retains nothing.
    pub keep_count: usize,
}

impl BranchPolicy {
    /// Creates a branch policy, compiling the membership pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBranchPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn new(name: impl Into<String>, pattern: &str, keep_count: usize) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidBranchPattern {
            branch: name.clone(),
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            name,
            pattern,
            keep_count,
        })
    }
}

/// Returns the fixed set of tracked branch policies for an invocation.
///
/// The primary branch uses the configured default keep count; the secondary
/// branch is hard-overridden to [`SECONDARY_BRANCH_KEEP_COUNT`]. Branch
/// names double as their membership patterns, so any tag containing the
/// branch name (`master-44`, `pre-master`, ...) is a member.
///
/// Callers relying on single evaluation per image must supply
/// non-overlapping patterns; the default pair does not overlap for
/// conventional tag naming, and the final delete set dedups at digest level
/// either way.
///
/// # Errors
///
/// Returns an error if a branch name fails to compile as a pattern. The
/// fixed names cannot fail; the fallible signature exists so a configurable
/// branch list can slot in without an interface change.
pub fn tracked_branches(config: &RetentionConfig) -> Result<Vec<BranchPolicy>> {
    Ok(vec![
        BranchPolicy::new(PRIMARY_BRANCH, PRIMARY_BRANCH, config.images_to_keep)?,
        BranchPolicy::new(
            SECONDARY_BRANCH,
            SECONDARY_BRANCH,
            SECONDARY_BRANCH_KEEP_COUNT,
        )?,
    ])
}

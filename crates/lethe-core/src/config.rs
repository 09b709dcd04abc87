//! Per-invocation retention configuration.
//!
//! Configuration is an explicit immutable value constructed once per
//! invocation and passed by reference into each component; nothing reads
//! ambient state, and a malformed value fails the invocation up front.

use regex::Regex;

use crate::error::{Error, Result};

/// Default number of tagged images retained per branch.
pub const DEFAULT_IMAGES_TO_KEEP: usize = 100;

/// Default tag-exemption pattern. Matches nothing: `^$` can only match an
/// empty tag, and registries do not produce empty tags.
pub const DEFAULT_IGNORE_TAGS_PATTERN: &str = "^$";

/// Immutable configuration for one sweep invocation.
///
/// Constructed fallibly so that a malformed exemption pattern fails the
/// invocation before any registry call is made.
///
/// # Examples
///
/// ```rust
/// use lethe_core::RetentionConfig;
///
/// let config = RetentionConfig::new(None, true, 50, "^release-")?;
/// assert!(config.dry_run);
/// assert_eq!(config.images_to_keep, 50);
/// assert!(config.is_tag_exempt("release-2026.08"));
/// assert!(!config.is_tag_exempt("master-44"));
/// # Ok::<(), lethe_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Target region, or `None` to enumerate all available regions.
    pub region: Option<String>,

    /// When true, no destructive call is issued; decisions are only reported.
    pub dry_run: bool,

    /// Default keep count for branches without an override.
    pub images_to_keep: usize,

    /// Tags matching this pattern are exempt from deletion even when
    /// otherwise eligible. Unanchored search.
    pub ignore_tags: Regex,
}

impl RetentionConfig {
    /// Creates a configuration, compiling the exemption pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIgnorePattern`] if `ignore_tags_pattern` is
    /// not a valid regular expression.
    pub fn new(
        region: Option<String>,
        dry_run: bool,
        images_to_keep: usize,
        ignore_tags_pattern: &str,
    ) -> Result<Self> {
        let ignore_tags =
            Regex::new(ignore_tags_pattern).map_err(|source| Error::InvalidIgnorePattern {
                pattern: ignore_tags_pattern.to_string(),
                source,
            })?;

        Ok(Self {
            region,
            dry_run,
            images_to_keep,
            ignore_tags,
        })
    }

    /// Creates a dry-run configuration with defaults for everything else.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lethe_core::RetentionConfig;
    ///
    /// let config = RetentionConfig::default_dry_run();
    /// assert!(config.dry_run);
    /// assert!(config.region.is_none());
    /// ```
    #[must_use]
    pub fn default_dry_run() -> Self {
        Self::new(None, true, DEFAULT_IMAGES_TO_KEEP, DEFAULT_IGNORE_TAGS_PATTERN)
            .unwrap_or_else(|_| unreachable!("default ignore pattern is valid"))
    }

    /// Returns true if a tag is exempt from deletion under the configured
    /// exemption pattern.
    ///
    /// Uses unanchored regex search: the pattern matches if found anywhere
    /// in the tag.
    #[must_use]
    pub fn is_tag_exempt(&self, tag: &str) -> bool {
        self.ignore_tags.is_match(tag)
    }
}

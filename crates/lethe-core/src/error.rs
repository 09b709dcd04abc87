//! Error types for Lethe core operations.
//!
//! This module defines the error types used throughout the `lethe-core` crate.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Lethe core operations.
///
/// All variants are configuration-time failures: they are raised while an
/// invocation's policy set is being constructed and must abort the run
/// before any registry call is made.
#[derive(Error, Debug)]
pub enum Error {
    /// A branch pattern is not a valid regular expression.
    #[error("Invalid branch pattern '{pattern}' for branch '{branch}': {source}")]
    InvalidBranchPattern {
        /// Branch name the pattern was configured for.
        branch: String,
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The tag-exemption pattern is not a valid regular expression.
    #[error("Invalid ignore-tags pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

}

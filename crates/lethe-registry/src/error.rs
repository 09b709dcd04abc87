//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to connect to the registry.
    #[error("Failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Authentication failed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// The control endpoint URL is invalid.
    #[error("Invalid registry URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// Region enumeration failed.
    #[error("Failed to list regions: {message}")]
    RegionListingFailed {
        /// Error message.
        message: String,
    },

    /// Repository enumeration failed for a region.
    #[error("Failed to list repositories in {region}: {message}")]
    RepositoryListingFailed {
        /// Region name.
        region: String,
        /// Error message.
        message: String,
    },

    /// Image listing failed for a repository.
    #[error("Failed to list images in {repository}: {message}")]
    ImageListingFailed {
        /// Repository name.
        repository: String,
        /// Error message.
        message: String,
    },

    /// A bulk-delete call failed.
    #[error("Failed to delete images in {repository}: {message}")]
    DeleteFailed {
        /// Repository name.
        repository: String,
        /// Error message.
        message: String,
    },

    /// HTTP error from the registry.
    #[error("HTTP error from registry: {status} - {message}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {source}")]
    JsonError {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else {
            let status = err.status().map_or(0, |s| s.as_u16());
            Self::HttpError {
                status,
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError { source: err }
    }
}

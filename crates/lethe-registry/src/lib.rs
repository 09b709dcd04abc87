//! # Lethe Registry
//!
//! Registry walker and bulk-delete driver for the Lethe sweeper.
//!
//! This crate connects the pure decision engine in `lethe-core` to a real
//! registry: it enumerates regions, repositories, and paginated image
//! listings, feeds each repository through the retention pipeline, and
//! submits (or simulates) the resulting size-bounded delete batches.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lethe_core::{tracked_branches, RetentionConfig};
//! use lethe_registry::{sweep, HttpRegistryClient, RegistryAuth, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let retention = RetentionConfig::default_dry_run();
//!     let policies = tracked_branches(&retention)?;
//!
//!     let config = RegistryConfig::new("https://registry.example.com")
//!         .with_auth(RegistryAuth::None);
//!     let client = HttpRegistryClient::new(config)?;
//!
//!     let summary = sweep(&client, &policies, &retention).await?;
//!     println!("{} repositories evaluated", summary.repositories());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod client;
mod config;
mod error;
mod sweep;

pub use api::{BatchDeleteResult, DeleteFailure, RegistryApi};
pub use client::HttpRegistryClient;
pub use config::{RegistryAuth, RegistryConfig};
pub use error::RegistryError;
pub use sweep::{sweep, ChunkOutcome, ChunkReport, RegionReport, RepositoryReport, RunSummary};

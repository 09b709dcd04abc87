//! Sweep command implementation.
//!
//! Builds the per-invocation retention configuration, walks the registry,
//! and renders the human-readable audit trail.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use lethe_core::{tracked_branches, RetentionConfig};
use lethe_registry::{
    sweep, ChunkOutcome, HttpRegistryClient, RegionReport, RegistryAuth, RegistryConfig,
    RepositoryReport,
};

/// Arguments for the sweep command.
#[derive(Args)]
pub struct SweepArgs {
    /// Registry control endpoint (e.g., `<https://registry.example.com>`)
    #[arg(short, long, env = "LETHE_REGISTRY_URL")]
    pub registry: String,

    /// Target region; omit to enumerate all available regions
    #[arg(long)]
    pub region: Option<String>,

    /// Print what would be deleted without deleting anything.
    /// Defaults to true; pass `--dry-run false` to actually delete.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub dry_run: bool,

    /// Number of tagged images to keep per branch
    #[arg(long, default_value_t = 100)]
    pub images_to_keep: usize,

    /// Regex of tag names exempt from deletion (unanchored search)
    #[arg(long, default_value = "^$")]
    pub ignore_tags_regex: String,

    /// Bearer token for authentication
    #[arg(long, env = "LETHE_REGISTRY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Username for basic authentication
    #[arg(short, long, env = "LETHE_REGISTRY_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "LETHE_REGISTRY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "60")]
    pub timeout: u64,
}

/// Runs the sweep command.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid (malformed regex, bad URL, incomplete auth)
/// - Region enumeration fails outright
/// - Any region, repository, or chunk recorded a failure (non-zero exit)
pub async fn run(args: &SweepArgs) -> Result<()> {
    // Invalid configuration must fail before any registry call is made.
    let retention = RetentionConfig::new(
        args.region.clone(),
        args.dry_run,
        args.images_to_keep,
        &args.ignore_tags_regex,
    )
    .context("Invalid retention configuration")?;
    let policies = tracked_branches(&retention).context("Invalid branch policies")?;

    let auth = determine_auth(args)?;
    let config = RegistryConfig::new(&args.registry)
        .with_auth(auth)
        .with_timeout(std::time::Duration::from_secs(args.timeout));
    let client = HttpRegistryClient::new(config).context("Failed to create registry client")?;

    info!(
        registry = %args.registry,
        dry_run = retention.dry_run,
        images_to_keep = retention.images_to_keep,
        "Starting sweep"
    );

    println!("Lethe Registry Sweeper");
    println!("======================");
    if retention.dry_run {
        println!("(dry run: no images will be deleted)");
    }

    let summary = sweep(&client, &policies, &retention)
        .await
        .context("Failed to enumerate regions")?;

    for region in &summary.regions {
        print_region(region);
    }

    println!();
    println!(
        "Done: {} repositories evaluated, {} images marked for deletion",
        summary.repositories(),
        summary.marked()
    );

    if summary.has_failures() {
        anyhow::bail!("Sweep completed with failures; see report above");
    }

    Ok(())
}

fn print_region(region: &RegionReport) {
    println!();
    println!("Region: {}", region.region);

    if let Some(ref error) = region.error {
        println!("  FAILED to list repositories: {error}");
        return;
    }

    for report in &region.repositories {
        print_repository(report);
    }
}

fn print_repository(report: &RepositoryReport) {
    println!("------------------------");
    println!("Starting with repository: {}", report.repository.repository_uri);

    if let Some(ref error) = report.error {
        println!("  FAILED to list images: {error}");
        return;
    }

    println!(
        "  Images found: {} (untagged: {})",
        report.images_found, report.untagged_found
    );

    if report.chunks.is_empty() {
        println!(
            "  Nothing to delete in repository: {}",
            report.repository.repository_name
        );
        return;
    }

    println!("  Images to delete: {}", report.marked());
    for chunk in &report.chunks {
        match &chunk.outcome {
            ChunkOutcome::Simulated => {
                println!("  Chunk {}: {} images (dry run)", chunk.index, chunk.digests.len());
                for digest in &chunk.digests {
                    println!("    {digest}");
                }
            }
            ChunkOutcome::Deleted { deleted, failures } => {
                println!(
                    "  Chunk {}: deleted {deleted}, failed {failures}",
                    chunk.index
                );
            }
            ChunkOutcome::Failed { message } => {
                println!("  Chunk {}: FAILED - {message}", chunk.index);
            }
        }
    }
    // The tag list is the human-facing audit trail; printed in both modes.
    if !report.tag_records.is_empty() {
        println!("  Image URLs that are marked for deletion:");
        for record in &report.tag_records {
            println!("  - {} - {}", record.image_url, record.pushed_at);
        }
    }
}

/// Determines the authentication method from CLI arguments.
fn determine_auth(args: &SweepArgs) -> Result<RegistryAuth> {
    if let Some(ref token) = args.token {
        return Ok(RegistryAuth::Bearer {
            token: token.clone(),
        });
    }

    if let (Some(ref username), Some(ref password)) = (&args.username, &args.password) {
        return Ok(RegistryAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        });
    }

    if args.username.is_some() || args.password.is_some() {
        anyhow::bail!("Both --username and --password are required for basic authentication");
    }

    // No auth - useful for local development
    Ok(RegistryAuth::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SweepArgs {
        SweepArgs {
            registry: "https://registry.example.com".to_string(),
            region: None,
            dry_run: true,
            images_to_keep: 100,
            ignore_tags_regex: "^$".to_string(),
            token: None,
            username: None,
            password: None,
            timeout: 60,
        }
    }

    #[test]
    fn test_determine_auth_none() {
        let auth = determine_auth(&args()).unwrap();
        assert!(matches!(auth, RegistryAuth::None));
    }

    #[test]
    fn test_determine_auth_bearer() {
        let mut args = args();
        args.token = Some("test-token".to_string());

        let auth = determine_auth(&args).unwrap();
        match auth {
            RegistryAuth::Bearer { token } => assert_eq!(token, "test-token"),
            _ => panic!("Expected Bearer auth"),
        }
    }

    #[test]
    fn test_determine_auth_basic() {
        let mut args = args();
        args.username = Some("user".to_string());
        args.password = Some("pass".to_string());

        let auth = determine_auth(&args).unwrap();
        match auth {
            RegistryAuth::Basic { username, password } => {
                assert_eq!(username, "user");
                assert_eq!(password, "pass");
            }
            _ => panic!("Expected Basic auth"),
        }
    }

    #[test]
    fn test_determine_auth_incomplete_basic() {
        let mut args = args();
        args.username = Some("user".to_string());

        assert!(determine_auth(&args).is_err());
    }

    #[test]
    fn test_invalid_ignore_regex_fails_before_any_registry_call() {
        let mut args = args();
        args.ignore_tags_regex = "(unclosed".to_string();

        let err = RetentionConfig::new(
            args.region.clone(),
            args.dry_run,
            args.images_to_keep,
            &args.ignore_tags_regex,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid ignore-tags pattern"));
    }
}

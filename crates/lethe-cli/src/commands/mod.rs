//! CLI commands and argument parsing.

pub mod sweep;

use clap::{Parser, Subcommand};

/// Lethe - Retention sweeper for branch-tagged container registries
#[derive(Parser)]
#[command(name = "lethe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate retention policies and delete stale images
    Sweep(sweep::SweepArgs),

    /// Print version information
    Version,
}

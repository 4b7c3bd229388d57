//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: sync rows into issues (default)
//! - check: validate configuration without touching any API

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sheet2issue::config::{RawConfig, Scalar};

/// sheet2issue - create GitHub issues from spreadsheet rows
#[derive(Parser, Debug)]
#[command(name = "sheet2issue")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log what would be created without creating issues or writing cells
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Maximum issues to create this run (0 = unlimited)
    #[arg(long, global = true)]
    pub max_issues: Option<i64>,

    /// Target repository as owner/repo (defaults to GITHUB_REPOSITORY)
    #[arg(short, long, global = true)]
    pub repository: Option<String>,

    /// File to append step outputs to (defaults to GITHUB_OUTPUT)
    #[arg(long, global = true)]
    pub github_output: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Configuration layer built from command-line flags
    pub fn overrides(&self) -> RawConfig {
        RawConfig {
            dry_run: self.dry_run.then_some(Scalar::Bool(true)),
            max_issues_per_run: self.max_issues.map(Scalar::Int),
            repository: self.repository.clone(),
            ..Default::default()
        }
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sync unsynced rows into issues
    Run,

    /// Validate configuration and print the resolved settings
    Check,
}

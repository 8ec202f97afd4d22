//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Publish a build artifact to a git remote as the next `V<n>` release tag.
#[derive(Debug, Parser)]
#[command(name = "tagpush")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding the build output and credentials file
    #[arg(short = 'C', long, global = true, env = "TAGPUSH_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Settings file (defaults to the nearest tagpush.toml)
    #[arg(long, global = true, env = "TAGPUSH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Publish the build artifact as the next release tag
    Release(commands::release::ReleaseArgs),

    /// Check the stored credentials against the remote
    Validate(commands::validate::ValidateArgs),

    /// Print the version the next release would get
    NextVersion(commands::next_version::NextVersionArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        let project = commands::Project::load(self.project_dir, self.config.as_deref())?;

        match self.command {
            Commands::Release(args) => commands::release::run(args, &project),
            Commands::Validate(args) => commands::validate::run(args, &project),
            Commands::NextVersion(args) => commands::next_version::run(args, &project),
        }
    }
}

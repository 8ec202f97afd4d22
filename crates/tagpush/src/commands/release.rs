//! Release command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tagpush_core::ReleaseWorkflow;
use tracing::info;

use super::{Project, credential_prompt, git_runner};

/// Arguments for the release command.
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Validate credentials and resolve the next version without pushing
    #[arg(short, long)]
    pub dry_run: bool,

    /// Never prompt; read credentials from the file or TAGPUSH_GIT_* variables
    #[arg(long)]
    pub non_interactive: bool,

    /// Artifact to publish instead of the one found in the build output
    #[arg(long)]
    pub artifact: Option<PathBuf>,
}

/// Runs the release command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ReleaseArgs, project: &Project) -> Result<()> {
    let runner = git_runner();
    let workflow = ReleaseWorkflow::new(&runner, &project.settings);
    let mut prompt = credential_prompt(args.non_interactive);

    if args.dry_run {
        let artifact = workflow
            .resolve_artifact(&project.dir, args.artifact.as_deref())
            .context("release failed")?;
        let credentials = workflow
            .resolve_credentials(&project.dir, prompt.as_mut())
            .context("release failed")?;
        let version = workflow
            .preview(&credentials)
            .context("failed to resolve next version")?;

        info!(%version, "dry run");
        println!("Would release {} as {version}", artifact.display());
        println!("Dry run completed. No changes were made.");
        return Ok(());
    }

    let outcome = workflow
        .run(&project.dir, args.artifact.as_deref(), prompt.as_mut())
        .context("release failed")?;

    if outcome.bootstrapped {
        println!("Initialized empty remote repository");
    }
    println!("[OK] Released {}", outcome.version);
    Ok(())
}

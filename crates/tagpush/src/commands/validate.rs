//! Validate command.

use anyhow::{Context, Result};
use clap::Args;
use tagpush_core::ReleaseWorkflow;
use tagpush_git::mask_userinfo;

use super::{Project, credential_prompt, git_runner};

/// Arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Never prompt; read credentials from the file or TAGPUSH_GIT_* variables
    #[arg(long)]
    pub non_interactive: bool,
}

/// Runs the validate command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ValidateArgs, project: &Project) -> Result<()> {
    let runner = git_runner();
    let workflow = ReleaseWorkflow::new(&runner, &project.settings);
    let mut prompt = credential_prompt(args.non_interactive);

    let credentials = workflow
        .resolve_credentials(&project.dir, prompt.as_mut())
        .context("credential validation failed")?;

    println!(
        "[OK] Credentials accepted by {}",
        mask_userinfo(&credentials.repository_url)
    );
    Ok(())
}

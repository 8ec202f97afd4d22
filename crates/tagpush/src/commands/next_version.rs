//! Next-version command.

use anyhow::{Context, Result};
use clap::Args;
use tagpush_core::{CoreError, ReleaseWorkflow};

use super::{Project, git_runner};

/// Arguments for the next-version command.
#[derive(Debug, Args)]
pub struct NextVersionArgs {}

/// Runs the next-version command.
///
/// Uses the stored credentials as they are; nothing is prompted or written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(_args: NextVersionArgs, project: &Project) -> Result<()> {
    let runner = git_runner();
    let workflow = ReleaseWorkflow::new(&runner, &project.settings);

    let store = workflow.credential_store(&project.dir);
    let credentials = store.load().context("failed to read credentials")?;
    let missing = credentials.missing_fields();
    if !missing.is_empty() {
        let fields: Vec<_> = missing.iter().map(ToString::to_string).collect();
        return Err(CoreError::MissingCredentials(format!(
            "{} not set in {}",
            fields.join(", "),
            store.path().display()
        )))
        .context("failed to resolve next version");
    }

    let version = workflow
        .preview(&credentials)
        .context("failed to resolve next version")?;
    println!("{version}");
    Ok(())
}

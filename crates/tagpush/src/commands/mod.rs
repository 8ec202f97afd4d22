//! Subcommands and the state they share.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tagpush_config::{Settings, find_and_load_settings_from, load_settings};
use tagpush_core::CredentialPrompt;
use tagpush_git::SystemRunner;
use tracing::debug;

use crate::prompt::{EnvPrompt, TerminalPrompt};

pub mod next_version;
pub mod release;
pub mod validate;

/// The project being released and its settings.
#[derive(Debug)]
pub struct Project {
    pub dir: PathBuf,
    pub settings: Settings,
}

impl Project {
    /// Resolves the project directory and loads its settings.
    pub fn load(project_dir: Option<PathBuf>, config: Option<&Path>) -> Result<Self> {
        let dir = match project_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("failed to read current directory")?,
        };

        let settings = match config {
            Some(path) => load_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => find_and_load_settings_from(&dir).context("failed to load settings")?,
        };

        debug!(dir = %dir.display(), "loaded project");
        Ok(Self { dir, settings })
    }
}

/// Returns the runner used for every git invocation.
///
/// Git must never block on its own credential prompt.
pub fn git_runner() -> SystemRunner {
    SystemRunner::new().with_env("GIT_TERMINAL_PROMPT", "0")
}

/// Picks the terminal prompt when stdin is interactive, the environment
/// prompt otherwise.
pub fn credential_prompt(non_interactive: bool) -> Box<dyn CredentialPrompt> {
    if non_interactive || !io::stdin().is_terminal() {
        debug!("using environment credentials");
        Box::new(EnvPrompt::from_env())
    } else {
        Box::new(TerminalPrompt::stdio())
    }
}

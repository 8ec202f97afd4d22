//! Credential prompts for the terminal and for headless runs.

use std::io::{self, BufRead, Stderr, StdinLock, Write};

use tagpush_config::Credentials;
use tagpush_core::{CredentialPrompt, PromptOutcome};
use tracing::warn;

const URL_VAR: &str = "TAGPUSH_GIT_URL";
const USERNAME_VAR: &str = "TAGPUSH_GIT_USERNAME";
const TOKEN_VAR: &str = "TAGPUSH_GIT_TOKEN";

/// Line-based prompt. End of input cancels.
pub struct TerminalPrompt<I, O> {
    input: I,
    output: O,
}

impl TerminalPrompt<StdinLock<'static>, Stderr> {
    /// Prompts on stderr and reads stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<I: BufRead, O: Write> TerminalPrompt<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks for one value; an empty answer keeps `current`.
    fn ask(&mut self, label: &str, current: &str, secret: bool) -> io::Result<Option<String>> {
        if current.is_empty() {
            write!(self.output, "{label}: ")?;
        } else if secret {
            write!(self.output, "{label} [********]: ")?;
        } else {
            write!(self.output, "{label} [{current}]: ")?;
        }
        self.output.flush()?;

        Ok(self.read_line()?.map(|answer| {
            if answer.is_empty() {
                current.to_string()
            } else {
                answer
            }
        }))
    }

    fn read_credentials(&mut self, current: &Credentials) -> io::Result<Option<Credentials>> {
        writeln!(self.output, "Git credentials (Ctrl-D to cancel)")?;

        let Some(url) = self.ask("Repository URL", &current.repository_url, false)? else {
            return Ok(None);
        };
        let Some(username) = self.ask("Username", &current.username, false)? else {
            return Ok(None);
        };
        let Some(token) = self.ask("Access token", &current.access_token, true)? else {
            return Ok(None);
        };

        Ok(Some(Credentials::new(url, username, token)))
    }

    fn read_confirm(&mut self, message: &str) -> io::Result<bool> {
        write!(self.output, "{message} [y/N]: ")?;
        self.output.flush()?;

        let answer = self.read_line()?.unwrap_or_default().to_ascii_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }
}

impl<I: BufRead, O: Write> CredentialPrompt for TerminalPrompt<I, O> {
    fn prompt_credentials(&mut self, current: &Credentials) -> PromptOutcome {
        match self.read_credentials(current) {
            Ok(Some(credentials)) => PromptOutcome::Entered(credentials),
            Ok(None) => {
                // keep the shell prompt on its own line after Ctrl-D
                if let Err(e) = writeln!(self.output) {
                    warn!(error = %e, "failed to write newline");
                }
                PromptOutcome::Cancelled
            }
            Err(e) => {
                warn!(error = %e, "failed to read credentials");
                PromptOutcome::Cancelled
            }
        }
    }

    fn prompt_confirm(&mut self, message: &str) -> bool {
        self.read_confirm(message).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read answer");
            false
        })
    }

    fn show_message(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{message}") {
            warn!(error = %e, "failed to write message");
        }
    }
}

/// Headless prompt fed from `TAGPUSH_GIT_*` variables.
///
/// The values are offered once, merged over the stored credentials; every
/// confirmation is declined so a failure ends the run.
#[derive(Debug, Default)]
pub struct EnvPrompt {
    url: Option<String>,
    username: Option<String>,
    token: Option<String>,
    offered: bool,
}

impl EnvPrompt {
    /// Reads the `TAGPUSH_GIT_URL`, `TAGPUSH_GIT_USERNAME` and
    /// `TAGPUSH_GIT_TOKEN` variables.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v: &String| !v.trim().is_empty());
        Self::new(var(URL_VAR), var(USERNAME_VAR), var(TOKEN_VAR))
    }

    pub fn new(url: Option<String>, username: Option<String>, token: Option<String>) -> Self {
        Self {
            url,
            username,
            token,
            offered: false,
        }
    }

    fn has_values(&self) -> bool {
        self.url.is_some() || self.username.is_some() || self.token.is_some()
    }
}

impl CredentialPrompt for EnvPrompt {
    fn prompt_credentials(&mut self, current: &Credentials) -> PromptOutcome {
        if self.offered || !self.has_values() {
            eprintln!("No usable credentials; set {URL_VAR}, {USERNAME_VAR} and {TOKEN_VAR}");
            return PromptOutcome::Cancelled;
        }
        self.offered = true;

        let pick = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        PromptOutcome::Entered(Credentials::new(
            pick(&self.url, &current.repository_url),
            pick(&self.username, &current.username),
            pick(&self.token, &current.access_token),
        ))
    }

    fn prompt_confirm(&mut self, message: &str) -> bool {
        eprintln!("{message} [non-interactive: no]");
        false
    }

    fn show_message(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

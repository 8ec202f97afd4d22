//! Credential prompt capability.

use tagpush_config::Credentials;

/// Result of asking the user for credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The user submitted values, possibly incomplete.
    Entered(Credentials),
    /// The user cancelled the dialog.
    Cancelled,
}

/// Interactive collaborator used by the retry loop.
///
/// Implementations may be a terminal, a GUI, or a headless source such as
/// environment variables.
pub trait CredentialPrompt {
    /// Asks for credentials, pre-filled with the current values.
    fn prompt_credentials(&mut self, current: &Credentials) -> PromptOutcome;

    /// Asks a yes/no question. Returns `true` when confirmed.
    fn prompt_confirm(&mut self, message: &str) -> bool;

    /// Shows a message that only needs acknowledging.
    fn show_message(&mut self, message: &str);
}

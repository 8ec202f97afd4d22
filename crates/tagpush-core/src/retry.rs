//! Bounded credential retry loop.
//!
//! The loop moves between asking the prompt for credentials and validating
//! them against the remote:
//!
//! ```text
//! NeedsInput ──entered──▶ Validating ──▶ Success            (done)
//!     ▲                       │      ──▶ RepositoryIssue    (confirm, free)
//!     └──────confirmed────────┘      ──▶ CredentialIssue    (confirm, counted)
//!                                    ──▶ UnknownIssue       (per policy)
//! ```
//!
//! Cancelling or declining ends in [`CoreError::Aborted`]; reaching the
//! attempt limit ends in [`CoreError::CredentialsExhausted`].

use tagpush_config::{CredentialSettings, CredentialStore, Credentials, UnknownIssuePolicy};
use tagpush_git::CommandRunner;
use tracing::{debug, info, warn};

use crate::{
    Classification, CoreError, CoreResult, CredentialPrompt, CredentialValidator, PromptOutcome,
};

/// Limits for the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of counted failures that ends the loop.
    pub max_attempts: u32,
    /// How [`Classification::UnknownIssue`] is handled.
    pub unknown_issue: UnknownIssuePolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            unknown_issue: UnknownIssuePolicy::CountAttempt,
        }
    }
}

impl From<&CredentialSettings> for RetryPolicy {
    fn from(settings: &CredentialSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            unknown_issue: settings.unknown_issue,
        }
    }
}

/// Progress of one retry loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Counted failures so far.
    pub attempt_count: u32,
    /// Latest validation result; `None` until the first validation.
    pub last_classification: Option<Classification>,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    NeedsInput,
    Validating,
    Classified(Classification),
}

/// Obtains validated credentials, prompting the user between failures.
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    /// Creates a controller with the given policy.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Loads credentials from `store` and loops until they validate.
    ///
    /// Credentials entered through the prompt are saved to `store` before
    /// they are validated.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Aborted`] when the user cancels or declines a
    /// retry, [`CoreError::CredentialsExhausted`] when the attempt limit is
    /// reached, and a config error when the store cannot be read.
    pub fn resolve<R, P>(
        &self,
        store: &CredentialStore,
        validator: &CredentialValidator<'_, R>,
        prompt: &mut P,
    ) -> CoreResult<Credentials>
    where
        R: CommandRunner + ?Sized,
        P: CredentialPrompt + ?Sized,
    {
        let mut credentials = store.load()?;
        let mut state = RetryState::default();
        let mut step = if credentials.is_complete() {
            Step::Validating
        } else {
            Step::NeedsInput
        };

        loop {
            debug!(
                ?step,
                attempts = state.attempt_count,
                last = ?state.last_classification,
                "credential retry step"
            );
            step = match step {
                Step::NeedsInput => match prompt.prompt_credentials(&credentials) {
                    PromptOutcome::Cancelled => {
                        prompt.show_message("Operation cancelled. Exiting...");
                        return Err(CoreError::Aborted);
                    }
                    PromptOutcome::Entered(entered) if !entered.is_complete() => {
                        prompt.show_message("All fields are required!");
                        credentials = entered;
                        Step::NeedsInput
                    }
                    PromptOutcome::Entered(entered) => {
                        if let Err(e) = store.persist(&entered) {
                            warn!(error = %e, "failed to save credentials");
                            prompt.show_message(&format!("Failed to save credentials: {e}"));
                        }
                        credentials = entered;
                        Step::Validating
                    }
                },
                Step::Validating => {
                    let classification = validator.validate(&credentials);
                    state.last_classification = Some(classification);
                    Step::Classified(classification)
                }
                Step::Classified(Classification::Success) => {
                    info!(attempts = state.attempt_count, "git credentials validated");
                    return Ok(credentials);
                }
                Step::Classified(Classification::RepositoryIssue) => Self::offer_retry(
                    prompt,
                    "Repository access problem. Retry with a different URL?",
                )?,
                Step::Classified(Classification::CredentialIssue) => {
                    self.count_attempt(&mut state, prompt, "Invalid credentials")?
                }
                Step::Classified(Classification::UnknownIssue) => match self.policy.unknown_issue
                {
                    UnknownIssuePolicy::CountAttempt => {
                        self.count_attempt(&mut state, prompt, "Could not validate credentials")?
                    }
                    UnknownIssuePolicy::FreeRetry => Self::offer_retry(
                        prompt,
                        "Could not validate credentials. Retry with different values?",
                    )?,
                    UnknownIssuePolicy::Abort => {
                        warn!(
                            attempts = state.attempt_count,
                            "credential validation inconclusive, aborting"
                        );
                        prompt.show_message("Could not validate credentials. Exiting.");
                        return Err(CoreError::Aborted);
                    }
                },
            };
        }
    }

    fn count_attempt<P: CredentialPrompt + ?Sized>(
        &self,
        state: &mut RetryState,
        prompt: &mut P,
        reason: &str,
    ) -> CoreResult<Step> {
        state.attempt_count += 1;
        if state.attempt_count >= self.policy.max_attempts {
            warn!(
                attempts = state.attempt_count,
                last = ?state.last_classification,
                "maximum credential attempts reached"
            );
            prompt.show_message("Maximum attempts reached. Exiting.");
            return Err(CoreError::CredentialsExhausted {
                attempts: state.attempt_count,
            });
        }

        let message = format!(
            "{reason} (attempt {}/{}). Try again?",
            state.attempt_count, self.policy.max_attempts
        );
        Self::offer_retry(prompt, &message)
    }

    fn offer_retry<P: CredentialPrompt + ?Sized>(prompt: &mut P, message: &str) -> CoreResult<Step> {
        if prompt.prompt_confirm(message) {
            Ok(Step::NeedsInput)
        } else {
            Err(CoreError::Aborted)
        }
    }
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

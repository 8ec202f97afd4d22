//! Release orchestration for tagpush.
//!
//! This crate publishes a build artifact as an annotated `V<n>` tag:
//! credential validation with bounded retry, remote version discovery, an
//! isolated workspace per release, and the git sequence that bootstraps an
//! empty remote or pushes the new tag.

mod artifact;
mod error;
mod prompt;
mod release;
mod remote;
mod retry;
mod validator;
mod version;
mod workspace;

#[cfg(test)]
mod testing;

pub use artifact::{check_artifact, locate_artifact};
pub use error::{CoreError, CoreResult};
pub use prompt::{CredentialPrompt, PromptOutcome};
pub use release::{ReleaseOutcome, ReleaseWorkflow};
pub use remote::authenticated_url;
pub use retry::{RetryController, RetryPolicy, RetryState};
pub use validator::{Classification, CredentialValidator, classify};
pub use version::{VersionResolver, VersionTag, parse_remote_tags};
pub use workspace::ReleaseWorkspace;

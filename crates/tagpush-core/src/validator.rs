//! Credential validation against the remote.

use std::fmt;

use tagpush_config::Credentials;
use tagpush_git::{CommandRunner, Git, ProcessResult, mask_userinfo};
use tracing::{debug, error};

use crate::authenticated_url;

/// Output fragments that mean the remote rejected the credentials.
const CREDENTIAL_MARKERS: &[&str] = &[
    "Authentication failed",
    "Invalid username or password",
    "HTTP Basic: Access denied",
    "could not read Username",
];

/// Output fragments that mean the repository itself is unreachable.
const REPOSITORY_MARKERS: &[&str] = &[
    "Repository not found",
    "Permission denied",
    "Bad hostname",
    "Could not resolve host",
    "Port number",
    "does not appear to be a git repository",
];

/// Outcome of probing the remote with a set of credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The remote accepted the credentials.
    Success,
    /// The URL, host, port or repository is wrong or not accessible.
    RepositoryIssue,
    /// The remote rejected the username or token.
    CredentialIssue,
    /// Anything else, including a listing that could not run.
    UnknownIssue,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::RepositoryIssue => "repository issue",
            Self::CredentialIssue => "credential issue",
            Self::UnknownIssue => "unknown issue",
        };
        f.write_str(s)
    }
}

/// Classifies the result of a remote branch listing.
#[must_use]
pub fn classify(result: &ProcessResult) -> Classification {
    if result.success() {
        return Classification::Success;
    }

    let output = result.combined_output();
    if CREDENTIAL_MARKERS.iter().any(|m| output.contains(m)) {
        Classification::CredentialIssue
    } else if REPOSITORY_MARKERS.iter().any(|m| output.contains(m)) {
        Classification::RepositoryIssue
    } else {
        Classification::UnknownIssue
    }
}

/// Checks the remote with a read-only branch listing.
pub struct CredentialValidator<'r, R: CommandRunner + ?Sized> {
    git: Git<'r, R>,
}

impl<'r, R: CommandRunner + ?Sized> CredentialValidator<'r, R> {
    /// Creates a validator that runs git through `runner`.
    #[must_use]
    pub fn new(runner: &'r R) -> Self {
        Self {
            git: Git::new(runner),
        }
    }

    /// Validates credentials against their repository.
    pub fn validate(&self, credentials: &Credentials) -> Classification {
        let url = authenticated_url(credentials);

        let result = match self.git.ls_remote_heads(&url, None) {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "error validating git credentials");
                return Classification::UnknownIssue;
            }
        };

        let classification = classify(&result);
        let output = mask_userinfo(&result.combined_output());
        match classification {
            Classification::Success => debug!("git credentials accepted"),
            Classification::CredentialIssue => error!(%output, "invalid git credentials"),
            Classification::RepositoryIssue => error!(%output, "access denied"),
            Classification::UnknownIssue => error!(%output, "error validating git credentials"),
        }

        classification
    }
}

//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A git command could not be launched or exited non-zero.
    #[error("git error: {0}")]
    Git(#[from] tagpush_git::GitError),

    /// The remote tag listing could not be executed.
    #[error("failed to discover remote versions: {0}")]
    VersionDiscovery(#[source] tagpush_git::GitError),

    /// No artifact in the build output directory.
    #[error("artifact not found: no file ending with `{suffix}` in {}", .dir.display())]
    ArtifactNotFound { dir: PathBuf, suffix: String },

    /// Required credentials are missing.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Credential validation failed too many times.
    #[error("credentials rejected after {attempts} attempts")]
    CredentialsExhausted { attempts: u32 },

    /// The user cancelled or declined a retry.
    #[error("aborted by user")]
    Aborted,

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] tagpush_config::ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

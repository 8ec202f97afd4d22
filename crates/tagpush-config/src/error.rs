//! Errors for the settings file and the credentials file.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading `tagpush.toml` or accessing the credentials file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested settings file does not exist.
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The settings file could not be read.
    #[error("cannot read settings file {}: {source}", .path.display())]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has unknown keys.
    #[error("invalid settings file {}: {source}", .path.display())]
    InvalidToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting holds a value the release cannot work with.
    #[error("invalid setting: {0}")]
    Invalid(String),

    /// The credentials file could not be read or replaced.
    #[error("cannot access credentials file {}: {source}", .path.display())]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

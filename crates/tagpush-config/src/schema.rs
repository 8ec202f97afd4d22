//! Release settings schema.

use serde::{Deserialize, Serialize};

use crate::credentials::CREDENTIALS_FILE_NAME;
use crate::{ConfigError, ConfigResult};

/// Main settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Artifact discovery.
    #[serde(default)]
    pub artifact: ArtifactSettings,

    /// Credentials file and retry behaviour.
    #[serde(default)]
    pub credentials: CredentialSettings,

    /// Release commit and tag messages.
    #[serde(default)]
    pub release: ReleaseSettings,

    /// Empty-repository bootstrap.
    #[serde(default)]
    pub bootstrap: BootstrapSettings,

    /// Git identity overrides.
    #[serde(default)]
    pub git: GitSettings,
}

impl Settings {
    /// Checks values that serde cannot validate on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or empty.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.credentials.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "credentials.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.artifact.suffix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "artifact.suffix must not be empty".to_string(),
            ));
        }
        if self.bootstrap.fallback_branch.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "bootstrap.fallback_branch must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Artifact discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSettings {
    /// Build output directory, relative to the project directory.
    #[serde(default = "default_artifact_dir")]
    pub dir: String,

    /// File name suffix identifying the artifact.
    #[serde(default = "default_artifact_suffix")]
    pub suffix: String,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            suffix: default_artifact_suffix(),
        }
    }
}

fn default_artifact_dir() -> String {
    "target".to_string()
}

fn default_artifact_suffix() -> String {
    "jar-with-dependencies.jar".to_string()
}

/// How an unclassified validation failure is retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownIssuePolicy {
    /// Consume an attempt, like an authentication failure.
    #[default]
    CountAttempt,
    /// Offer a retry without consuming an attempt, like a repository issue.
    FreeRetry,
    /// Stop immediately.
    Abort,
}

/// Credentials settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSettings {
    /// Properties file holding `git.url`, `git.username` and `git.token`.
    #[serde(default = "default_credentials_file")]
    pub file: String,

    /// Maximum number of failed credential validations.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Handling of validation failures that match no known marker.
    #[serde(default)]
    pub unknown_issue: UnknownIssuePolicy,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            file: default_credentials_file(),
            max_attempts: default_max_attempts(),
            unknown_issue: UnknownIssuePolicy::default(),
        }
    }
}

fn default_credentials_file() -> String {
    CREDENTIALS_FILE_NAME.to_string()
}

fn default_max_attempts() -> u32 {
    3
}

/// Release commit and tag settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSettings {
    /// Message of the commit that carries the artifact.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Annotated tag message; `{version}` is replaced with the tag name.
    #[serde(default = "default_tag_message")]
    pub tag_message: String,
}

impl ReleaseSettings {
    /// Renders the tag message for a version.
    #[must_use]
    pub fn tag_message_for(&self, version: &str) -> String {
        self.tag_message.replace("{version}", version)
    }
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            commit_message: default_commit_message(),
            tag_message: default_tag_message(),
        }
    }
}

fn default_commit_message() -> String {
    "Add JAR file for release".to_string()
}

fn default_tag_message() -> String {
    "Release {version}".to_string()
}

/// Settings for initializing an empty remote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// Content of the `README.md` committed first.
    #[serde(default = "default_readme")]
    pub readme: String,

    /// Message of the README commit.
    #[serde(default = "default_bootstrap_message")]
    pub commit_message: String,

    /// Branch pushed when `HEAD` cannot be resolved.
    #[serde(default = "default_fallback_branch")]
    pub fallback_branch: String,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            readme: default_readme(),
            commit_message: default_bootstrap_message(),
            fallback_branch: default_fallback_branch(),
        }
    }
}

fn default_readme() -> String {
    "# My Project".to_string()
}

fn default_bootstrap_message() -> String {
    "Initial commit with README".to_string()
}

fn default_fallback_branch() -> String {
    "main".to_string()
}

/// Git identity overrides. Unset values fall back to git's own config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitSettings {
    /// Name for commits and tags.
    pub author_name: Option<String>,

    /// Email for commits and tags.
    pub author_email: Option<String>,
}

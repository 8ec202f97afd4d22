//! Configuration management for tagpush.
//!
//! This crate handles:
//! - The `.env` credentials file (`git.url`, `git.username`, `git.token`)
//! - The optional `tagpush.toml` release settings

mod credentials;
mod error;
mod loader;
mod properties;
mod schema;

pub use credentials::{CREDENTIALS_FILE_NAME, CredentialField, CredentialStore, Credentials};
pub use error::{ConfigError, ConfigResult};
pub use loader::{SETTINGS_FILE_NAME, find_and_load_settings_from, load_settings};
pub use schema::{
    ArtifactSettings, BootstrapSettings, CredentialSettings, GitSettings, ReleaseSettings,
    Settings, UnknownIssuePolicy,
};

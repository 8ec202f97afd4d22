//! Repository credentials and their `.env` store.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{ConfigError, ConfigResult, properties};

/// Default credentials file, relative to the project directory.
pub const CREDENTIALS_FILE_NAME: &str = ".env";

/// A required credential key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CredentialField {
    /// `git.url`
    Url,
    /// `git.username`
    Username,
    /// `git.token`
    Token,
}

impl CredentialField {
    /// All fields, in file order.
    pub const ALL: [Self; 3] = [Self::Url, Self::Username, Self::Token];

    /// Returns the properties key for this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Url => "git.url",
            Self::Username => "git.username",
            Self::Token => "git.token",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Credentials for the release repository.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Repository URL, usually `https://...`.
    pub repository_url: String,
    /// Account name.
    pub username: String,
    /// Access token or app password.
    pub access_token: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    #[must_use]
    pub fn new(
        repository_url: impl Into<String>,
        username: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            repository_url: repository_url.into(),
            username: username.into(),
            access_token: access_token.into(),
        }
    }

    /// Returns the value stored for a field.
    #[must_use]
    pub fn get(&self, field: CredentialField) -> &str {
        match field {
            CredentialField::Url => &self.repository_url,
            CredentialField::Username => &self.username,
            CredentialField::Token => &self.access_token,
        }
    }

    /// Returns the fields that are empty or whitespace only.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<CredentialField> {
        CredentialField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Returns whether all fields are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.access_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Credentials")
            .field("repository_url", &self.repository_url)
            .field("username", &self.username)
            .field("access_token", &token)
            .finish()
    }
}

/// Reads and writes credentials in a properties file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads credentials. A missing file yields empty credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> ConfigResult<Credentials> {
        if !self.path.exists() {
            debug!(path = ?self.path, "credentials file not found, starting empty");
            return Ok(Credentials::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.file_error(e))?;
        let entries = properties::parse(&content);
        let value = |field: CredentialField| {
            entries
                .get(field.key())
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        Ok(Credentials {
            repository_url: value(CredentialField::Url),
            username: value(CredentialField::Username),
            access_token: value(CredentialField::Token),
        })
    }

    /// Writes credentials, keeping any unrelated keys already in the file.
    ///
    /// The new content goes to a temporary file in the same directory which
    /// then replaces the target, so readers never see a partial file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or replaced.
    pub fn persist(&self, credentials: &Credentials) -> ConfigResult<()> {
        let mut entries = if self.path.exists() {
            properties::parse(&std::fs::read_to_string(&self.path).map_err(|e| self.file_error(e))?)
        } else {
            Default::default()
        };
        for field in CredentialField::ALL {
            entries.insert(field.key().to_string(), credentials.get(field).to_string());
        }

        let timestamp = Utc::now().to_rfc2822();
        let content = properties::render(&entries, &["Git Credentials", &timestamp]);

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.file_error(e))?;
        file.write_all(content.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| self.file_error(e))?;
        file.persist(&self.path)
            .map_err(|e| self.file_error(e.error))?;

        info!(path = ?self.path, "saved credentials");
        Ok(())
    }

    fn file_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::CredentialFile {
            path: self.path.clone(),
            source,
        }
    }
}

//! Settings loader.

use std::path::Path;

use tracing::debug;

use crate::{ConfigError, ConfigResult, Settings};

/// Default settings file name.
pub const SETTINGS_FILE_NAME: &str = "tagpush.toml";

/// Loads and validates settings from the given path.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be parsed, or holds
/// invalid values.
pub fn load_settings(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let path = path.as_ref();
    debug!(?path, "loading settings");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SettingsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&content).map_err(|source| ConfigError::InvalidToml {
        path: path.to_path_buf(),
        source,
    })?;
    settings.validate()?;

    Ok(settings)
}

/// Finds and loads settings starting from the given directory.
///
/// Walks up the directory tree until a settings file is found. The file is
/// optional: defaults are returned when none exists.
///
/// # Errors
///
/// Returns an error if a settings file is found but cannot be loaded.
pub fn find_and_load_settings_from(start_dir: impl AsRef<Path>) -> ConfigResult<Settings> {
    let mut dir = start_dir.as_ref();

    loop {
        let settings_path = dir.join(SETTINGS_FILE_NAME);
        if settings_path.exists() {
            return load_settings(settings_path);
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    debug!("no settings file found, using defaults");
    Ok(Settings::default())
}

//! Build artifact discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

/// Finds the file in `dir` whose name ends with `suffix`.
///
/// Only regular files directly inside `dir` are considered. When several
/// match, the first by name is returned and the others are logged.
///
/// # Errors
///
/// Returns [`CoreError::ArtifactNotFound`] if `dir` is missing or holds no
/// matching file, and an IO error if it cannot be listed.
pub fn locate_artifact(dir: &Path, suffix: &str) -> CoreResult<PathBuf> {
    let not_found = || CoreError::ArtifactNotFound {
        dir: dir.to_path_buf(),
        suffix: suffix.to_string(),
    };

    if !dir.is_dir() {
        return Err(not_found());
    }

    let mut matches = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            matches.push(entry.path());
        }
    }
    matches.sort();

    let mut matches = matches.into_iter();
    let artifact = matches.next().ok_or_else(not_found)?;
    let ignored: Vec<_> = matches.map(|p| p.display().to_string()).collect();
    if !ignored.is_empty() {
        warn!(
            selected = %artifact.display(),
            ?ignored,
            "several artifacts found, using the first"
        );
    }

    debug!(artifact = %artifact.display(), "located artifact");
    Ok(artifact)
}

/// Checks that an explicitly given artifact is a regular file.
///
/// # Errors
///
/// Returns [`CoreError::ArtifactNotFound`] otherwise.
pub fn check_artifact(path: &Path) -> CoreResult<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let suffix = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Err(CoreError::ArtifactNotFound { dir, suffix })
}

//! Per-release temporary workspace.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

const WORKSPACE_PREFIX: &str = "git-release";

/// An exclusively owned temporary directory, deleted recursively on drop.
///
/// Dropping the workspace is the cleanup path for every outcome: success,
/// an error returned with `?`, or a panic unwinding through the owner.
#[derive(Debug)]
pub struct ReleaseWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ReleaseWorkspace {
    /// Creates a workspace in the system temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn acquire() -> CoreResult<Self> {
        Self::from_dir(tempfile::Builder::new().prefix(WORKSPACE_PREFIX).tempdir()?)
    }

    /// Creates a workspace inside `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn acquire_in(parent: impl AsRef<Path>) -> CoreResult<Self> {
        Self::from_dir(
            tempfile::Builder::new()
                .prefix(WORKSPACE_PREFIX)
                .tempdir_in(parent)?,
        )
    }

    fn from_dir(dir: TempDir) -> CoreResult<Self> {
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "acquired release workspace");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Returns the workspace directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copies the artifact into the workspace root, keeping its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if `artifact` has no file name or cannot be copied.
    pub fn stage(&self, artifact: &Path) -> CoreResult<PathBuf> {
        let name = artifact.file_name().ok_or_else(|| {
            CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("artifact path has no file name: {}", artifact.display()),
            ))
        })?;

        let staged = self.path.join(name);
        fs::copy(artifact, &staged)?;
        debug!(staged = %staged.display(), "staged artifact");

        Ok(staged)
    }

    /// Writes a file at `name` relative to the workspace root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_file(&self, name: &str, content: &str) -> CoreResult<PathBuf> {
        let path = self.path.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }
}

impl Drop for ReleaseWorkspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        match dir.close() {
            Ok(()) => debug!(path = %self.path.display(), "removed release workspace"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove release workspace"
            ),
        }
    }
}

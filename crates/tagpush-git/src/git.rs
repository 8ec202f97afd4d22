//! Porcelain git operations.

use std::path::Path;

use tracing::debug;

use crate::{CommandRunner, GitResult, ProcessResult};

/// Author identity passed to git with `-c user.name=... -c user.email=...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Author and committer name.
    pub name: String,
    /// Author and committer email.
    pub email: String,
}

impl Identity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The git operations a release needs, run through a [`CommandRunner`].
///
/// Listing operations tolerate a non-zero exit and hand back the raw
/// [`ProcessResult`]; every mutating operation fails on a non-zero exit.
pub struct Git<'r, R: CommandRunner + ?Sized> {
    runner: &'r R,
    identity: Option<Identity>,
}

impl<'r, R: CommandRunner + ?Sized> Git<'r, R> {
    /// Creates a git facade over the given runner.
    #[must_use]
    pub fn new(runner: &'r R) -> Self {
        Self {
            runner,
            identity: None,
        }
    }

    /// Sets the identity used for commits and tags.
    #[must_use]
    pub fn with_identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    /// Lists the branches of a remote (`git ls-remote --heads`).
    ///
    /// # Errors
    ///
    /// Returns an error only if git cannot be launched.
    pub fn ls_remote_heads(&self, url: &str, dir: Option<&Path>) -> GitResult<ProcessResult> {
        self.runner.run(&self.argv(&["ls-remote", "--heads", url]), dir)
    }

    /// Lists the tags of a remote (`git ls-remote --tags`).
    ///
    /// # Errors
    ///
    /// Returns an error only if git cannot be launched.
    pub fn ls_remote_tags(&self, url: &str, dir: Option<&Path>) -> GitResult<ProcessResult> {
        self.runner.run(&self.argv(&["ls-remote", "--tags", url]), dir)
    }

    /// Initializes a repository in `dir`. Safe to call on an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn init(&self, dir: &Path) -> GitResult<()> {
        self.runner.run_or_fail(&self.argv(&["init"]), Some(dir))?;
        Ok(())
    }

    /// Stages a path relative to `dir`. The path is never read as an option.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn add(&self, dir: &Path, path: &str) -> GitResult<()> {
        self.runner.run_or_fail(&self.argv(&["add", "--", path]), Some(dir))?;
        Ok(())
    }

    /// Commits the staged changes.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails, for example when nothing is staged.
    pub fn commit(&self, dir: &Path, message: &str) -> GitResult<()> {
        self.runner
            .run_or_fail(&self.argv(&["commit", "-m", message]), Some(dir))?;
        Ok(())
    }

    /// Returns the branch `HEAD` points to, or `None` if it cannot be read.
    pub fn current_branch(&self, dir: &Path) -> Option<String> {
        let result = self
            .runner
            .run(&self.argv(&["symbolic-ref", "--short", "HEAD"]), Some(dir));

        match result {
            Ok(result) if result.success() => {
                let branch = result.stdout().trim();
                (!branch.is_empty()).then(|| branch.to_string())
            }
            Ok(result) => {
                debug!(output = %result.combined_output(), "symbolic-ref failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "symbolic-ref could not run");
                None
            }
        }
    }

    /// Creates an annotated tag on `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails, for example when the tag already exists.
    pub fn tag_annotated(&self, dir: &Path, name: &str, message: &str) -> GitResult<()> {
        self.runner
            .run_or_fail(&self.argv(&["tag", "-a", name, "-m", message]), Some(dir))?;
        Ok(())
    }

    /// Pushes a ref to a remote URL.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn push(&self, dir: &Path, url: &str, refspec: &str) -> GitResult<()> {
        self.runner
            .run_or_fail(&self.argv(&["push", url, refspec]), Some(dir))?;
        Ok(())
    }

    fn argv(&self, args: &[&str]) -> Vec<String> {
        let mut argv = vec!["git".to_string()];
        if let Some(identity) = &self.identity {
            argv.push("-c".to_string());
            argv.push(format!("user.name={}", identity.name));
            argv.push("-c".to_string());
            argv.push(format!("user.email={}", identity.email));
        }
        argv.extend(args.iter().map(|a| (*a).to_string()));
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GitError, SystemRunner};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn identity() -> Option<Identity> {
        Some(Identity::new("Test User", "test@example.com"))
    }

    fn create_bare_remote(temp_dir: &TempDir) -> PathBuf {
        let remote = temp_dir.path().join("remote.git");
        let status = std::process::Command::new("git")
            .args(["init", "--bare"])
            .arg(&remote)
            .output()
            .unwrap();
        assert!(status.status.success());
        remote
    }

    fn create_repo_with_commit(git: &Git<'_, SystemRunner>, dir: &Path) {
        git.init(dir).unwrap();
        fs::write(dir.join("file.txt"), "content").unwrap();
        git.add(dir, "file.txt").unwrap();
        git.commit(dir, "Initial commit").unwrap();
    }

    #[test]
    fn test_argv_without_identity() {
        let runner = SystemRunner::new();
        let git = Git::new(&runner);
        assert_eq!(git.argv(&["init"]), vec!["git", "init"]);
    }

    #[test]
    fn test_argv_with_identity() {
        let runner = SystemRunner::new();
        let git = Git::new(&runner).with_identity(identity());
        assert_eq!(
            git.argv(&["commit", "-m", "msg"]),
            vec![
                "git",
                "-c",
                "user.name=Test User",
                "-c",
                "user.email=test@example.com",
                "commit",
                "-m",
                "msg"
            ]
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let git = Git::new(&runner);

        git.init(temp_dir.path()).unwrap();
        git.init(temp_dir.path()).unwrap();

        assert!(temp_dir.path().join(".git").is_dir());
    }

    #[test]
    fn test_commit_without_changes_fails() {
        let temp_dir = TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let git = Git::new(&runner).with_identity(identity());
        git.init(temp_dir.path()).unwrap();

        let result = git.commit(temp_dir.path(), "nothing here");
        assert!(matches!(result, Err(GitError::CommandFailed { .. })));
    }

    #[test]
    fn test_add_dash_prefixed_file() {
        let temp_dir = TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let git = Git::new(&runner).with_identity(identity());
        git.init(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("--all.jar"), "x").unwrap();
        fs::write(temp_dir.path().join("other.txt"), "x").unwrap();

        git.add(temp_dir.path(), "--all.jar").unwrap();

        let staged = runner
            .run_or_fail(
                &["git", "diff", "--cached", "--name-only"].map(String::from),
                Some(temp_dir.path()),
            )
            .unwrap();
        assert_eq!(staged.stdout().trim(), "--all.jar");
    }

    #[test]
    fn test_current_branch_after_commit() {
        let temp_dir = TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let git = Git::new(&runner).with_identity(identity());
        create_repo_with_commit(&git, temp_dir.path());

        let branch = git.current_branch(temp_dir.path());
        assert!(branch.is_some_and(|b| !b.is_empty()));
    }

    #[test]
    fn test_current_branch_outside_repo() {
        let temp_dir = TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let git = Git::new(&runner);

        assert_eq!(git.current_branch(temp_dir.path()), None);
    }

    #[test]
    fn test_ls_remote_heads_empty_remote() {
        let temp_dir = TempDir::new().unwrap();
        let remote = create_bare_remote(&temp_dir);
        let runner = SystemRunner::new();
        let git = Git::new(&runner);

        let result = git.ls_remote_heads(remote.to_str().unwrap(), None).unwrap();
        assert!(result.success());
        assert!(result.stdout().trim().is_empty());
    }

    #[test]
    fn test_ls_remote_missing_remote_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.git");
        let runner = SystemRunner::new();
        let git = Git::new(&runner);

        let result = git.ls_remote_tags(missing.to_str().unwrap(), None).unwrap();
        assert!(!result.success());
    }

    #[test]
    fn test_tag_and_push() {
        let temp_dir = TempDir::new().unwrap();
        let remote = create_bare_remote(&temp_dir);
        let work = temp_dir.path().join("work");
        fs::create_dir(&work).unwrap();

        let runner = SystemRunner::new();
        let git = Git::new(&runner).with_identity(identity());
        create_repo_with_commit(&git, &work);

        let url = remote.to_str().unwrap();
        git.tag_annotated(&work, "V1", "Release V1").unwrap();
        git.push(&work, url, "V1").unwrap();

        let tags = git.ls_remote_tags(url, None).unwrap();
        assert!(tags.stdout().contains("refs/tags/V1"));
    }

    #[test]
    fn test_duplicate_tag_fails() {
        let temp_dir = TempDir::new().unwrap();
        let runner = SystemRunner::new();
        let git = Git::new(&runner).with_identity(identity());
        create_repo_with_commit(&git, temp_dir.path());

        git.tag_annotated(temp_dir.path(), "V1", "Release V1").unwrap();
        let result = git.tag_annotated(temp_dir.path(), "V1", "Release V1");
        assert!(result.is_err());
    }
}

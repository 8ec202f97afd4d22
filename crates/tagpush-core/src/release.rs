//! Release workflow.

use std::path::{Path, PathBuf};

use tagpush_config::{CredentialStore, Credentials, GitSettings, Settings};
use tagpush_git::{CommandRunner, Git, Identity, mask_userinfo};
use tracing::{debug, info, warn};

use crate::{
    CoreResult, CredentialPrompt, CredentialValidator, ReleaseWorkspace, RetryController,
    RetryPolicy, VersionResolver, VersionTag, authenticated_url,
};

const README_FILE: &str = "README.md";

/// Result of a completed release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// The tag that was pushed.
    pub version: VersionTag,
    /// Whether the remote was empty and received an initial commit first.
    pub bootstrapped: bool,
}

/// Publishes an artifact to the remote as an annotated version tag.
///
/// One call to [`ReleaseWorkflow::run`] is one linear pass: nothing is
/// retried after the credentials are settled, and the workspace is removed
/// on every exit path.
pub struct ReleaseWorkflow<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    settings: &'a Settings,
    workspace_root: Option<PathBuf>,
}

impl<'a, R: CommandRunner + ?Sized> ReleaseWorkflow<'a, R> {
    /// Creates a workflow running git through `runner`.
    #[must_use]
    pub fn new(runner: &'a R, settings: &'a Settings) -> Self {
        Self {
            runner,
            settings,
            workspace_root: None,
        }
    }

    /// Creates release workspaces under `root` instead of the system
    /// temporary directory.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Returns the credential store of a project.
    #[must_use]
    pub fn credential_store(&self, project_dir: &Path) -> CredentialStore {
        CredentialStore::new(project_dir.join(&self.settings.credentials.file))
    }

    /// Finds the build artifact of a project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::ArtifactNotFound`] if there is none.
    pub fn locate_artifact(&self, project_dir: &Path) -> CoreResult<PathBuf> {
        let artifact = &self.settings.artifact;
        crate::locate_artifact(&project_dir.join(&artifact.dir), &artifact.suffix)
    }

    /// Returns `artifact` when given, the located build artifact otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::ArtifactNotFound`] if the given path is not
    /// a file or no artifact is found.
    pub fn resolve_artifact(&self, project_dir: &Path, artifact: Option<&Path>) -> CoreResult<PathBuf> {
        match artifact {
            Some(path) => crate::check_artifact(path),
            None => self.locate_artifact(project_dir),
        }
    }

    /// Loads the stored credentials and runs the retry loop until they
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the user aborts or the attempts run out.
    pub fn resolve_credentials<P>(&self, project_dir: &Path, prompt: &mut P) -> CoreResult<Credentials>
    where
        P: CredentialPrompt + ?Sized,
    {
        let store = self.credential_store(project_dir);
        let validator = CredentialValidator::new(self.runner);
        let controller = RetryController::new(RetryPolicy::from(&self.settings.credentials));

        debug!(path = %store.path().display(), "resolving git credentials");
        controller.resolve(&store, &validator, prompt)
    }

    /// Runs the whole release for a project.
    ///
    /// The artifact is located before any remote interaction; `artifact`
    /// overrides the lookup.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: missing artifact, unresolved
    /// credentials, or a failed git step.
    pub fn run<P>(
        &self,
        project_dir: &Path,
        artifact: Option<&Path>,
        prompt: &mut P,
    ) -> CoreResult<ReleaseOutcome>
    where
        P: CredentialPrompt + ?Sized,
    {
        let artifact = self.resolve_artifact(project_dir, artifact)?;
        info!(artifact = %artifact.display(), "releasing artifact");

        let credentials = self.resolve_credentials(project_dir, prompt)?;
        self.publish(&credentials, &artifact)
    }

    /// Resolves the version the next release would get.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::VersionDiscovery`] if the tag listing
    /// cannot run.
    pub fn preview(&self, credentials: &Credentials) -> CoreResult<VersionTag> {
        VersionResolver::new(self.runner).next_version(&authenticated_url(credentials))
    }

    /// Publishes `artifact` from a fresh workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace cannot be created or a git step
    /// fails. The workspace is removed either way.
    pub fn publish(&self, credentials: &Credentials, artifact: &Path) -> CoreResult<ReleaseOutcome> {
        let workspace = match &self.workspace_root {
            Some(root) => ReleaseWorkspace::acquire_in(root)?,
            None => ReleaseWorkspace::acquire()?,
        };
        self.publish_in(&workspace, credentials, artifact)
    }

    /// Publishes `artifact` from an existing workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if any git step fails.
    pub fn publish_in(
        &self,
        workspace: &ReleaseWorkspace,
        credentials: &Credentials,
        artifact: &Path,
    ) -> CoreResult<ReleaseOutcome> {
        let url = authenticated_url(credentials);
        let git = Git::new(self.runner).with_identity(identity(&self.settings.git));
        let dir = workspace.path();

        let heads = git.ls_remote_heads(&url, Some(dir))?.into_checked()?;
        let bootstrapped = heads.stdout().trim().is_empty();
        if bootstrapped {
            self.bootstrap(&git, workspace, &url)?;
        }

        git.init(dir)?;
        let staged = workspace.stage(artifact)?;
        let staged_name = staged
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        git.add(dir, &staged_name)?;
        git.commit(dir, &self.settings.release.commit_message)?;

        let version = VersionResolver::new(self.runner).next_version(&url)?;
        let tag = version.to_string();
        git.tag_annotated(dir, &tag, &self.settings.release.tag_message_for(&tag))?;
        git.push(dir, &url, &format!("refs/tags/{tag}"))?;

        info!(version = %tag, artifact = %staged_name, "pushed release tag");
        Ok(ReleaseOutcome {
            version,
            bootstrapped,
        })
    }

    fn bootstrap(&self, git: &Git<'_, R>, workspace: &ReleaseWorkspace, url: &str) -> CoreResult<()> {
        let bootstrap = &self.settings.bootstrap;
        let dir = workspace.path();
        info!(url = %mask_userinfo(url), "remote has no branches, bootstrapping");

        git.init(dir)?;
        workspace.write_file(README_FILE, &bootstrap.readme)?;
        git.add(dir, README_FILE)?;
        git.commit(dir, &bootstrap.commit_message)?;

        let branch = git.current_branch(dir).unwrap_or_else(|| {
            debug!(fallback = %bootstrap.fallback_branch, "default branch not detected");
            bootstrap.fallback_branch.clone()
        });
        git.push(dir, url, &branch)?;

        info!(%branch, "pushed initial branch");
        Ok(())
    }
}

fn identity(settings: &GitSettings) -> Option<Identity> {
    match (&settings.author_name, &settings.author_email) {
        (Some(name), Some(email)) => Some(Identity::new(name, email)),
        (None, None) => None,
        _ => {
            warn!("git author needs both a name and an email, ignoring");
            None
        }
    }
}

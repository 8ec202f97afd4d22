//! Release version discovery.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tagpush_git::{CommandRunner, Git, ProcessResult};
use tracing::debug;

use crate::{CoreError, CoreResult};

/// Matches one `ls-remote --tags` line for a `V...` tag, peeled or not.
static TAG_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\S+\s+refs/tags/(V[^\s^]*)(?:\^\{\})?\s*$").expect("invalid regex")
});

/// A release version, rendered as `V<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag(u64);

impl VersionTag {
    /// The version used when the remote has no release tags.
    pub const FIRST: Self = Self(1);

    /// Parses a tag name such as `V12`. `V0` is not a version.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let digits = name.strip_prefix('V')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().filter(|n| *n > 0).map(Self)
    }

    /// Returns the version after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// Extracts the distinct release versions from `ls-remote --tags` output.
///
/// Tags that [`VersionTag::parse`] rejects are skipped.
#[must_use]
pub fn parse_remote_tags(output: &str) -> BTreeSet<VersionTag> {
    TAG_LINE_RE
        .captures_iter(output)
        .filter_map(|caps| VersionTag::parse(&caps[1]))
        .collect()
}

/// Computes the next release version from the remote's tags.
pub struct VersionResolver<'r, R: CommandRunner + ?Sized> {
    git: Git<'r, R>,
}

impl<'r, R: CommandRunner + ?Sized> VersionResolver<'r, R> {
    /// Creates a resolver that runs git through `runner`.
    #[must_use]
    pub fn new(runner: &'r R) -> Self {
        Self {
            git: Git::new(runner),
        }
    }

    /// Returns `max(existing) + 1`, or `V1` when the remote has no release tags.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::VersionDiscovery`] if the tag listing cannot be
    /// launched or exits non-zero.
    pub fn next_version(&self, url: &str) -> CoreResult<VersionTag> {
        let result = self
            .git
            .ls_remote_tags(url, None)
            .and_then(ProcessResult::into_checked)
            .map_err(CoreError::VersionDiscovery)?;

        let existing = parse_remote_tags(result.stdout());
        let next = existing
            .last()
            .copied()
            .map_or(VersionTag::FIRST, VersionTag::next);
        debug!(existing = existing.len(), %next, "resolved next version");

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;
    use tagpush_git::GitError;

    const SHA: &str = "3f786850e387550fdab836ed7e6dc881de23001b";

    fn listing(tags: &[&str]) -> String {
        tags.iter()
            .map(|t| format!("{SHA}\trefs/tags/{t}\n"))
            .collect()
    }

    fn names(tags: &BTreeSet<VersionTag>) -> Vec<String> {
        tags.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_tag_name() {
        assert_eq!(VersionTag::parse("V12").map(|v| v.to_string()), Some("V12".to_string()));
        assert_eq!(VersionTag::parse("V0"), None);
        assert_eq!(VersionTag::parse("V"), None);
        assert_eq!(VersionTag::parse("v3"), None);
        assert_eq!(VersionTag::parse("V3a"), None);
        assert_eq!(VersionTag::parse("V+3"), None);
        assert_eq!(VersionTag::parse("1.0.0"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(VersionTag::FIRST.to_string(), "V1");
        assert_eq!(VersionTag::FIRST.next().next().to_string(), "V3");
    }

    #[test]
    fn test_parse_remote_tags_with_gap() {
        let tags = parse_remote_tags(&listing(&["V1", "V2", "V4"]));
        assert_eq!(names(&tags), vec!["V1", "V2", "V4"]);
    }

    #[test]
    fn test_parse_remote_tags_deduplicates_peeled() {
        let tags = parse_remote_tags(&listing(&["V7", "V7^{}", "V3", "V3^{}"]));
        assert_eq!(names(&tags), vec!["V3", "V7"]);
    }

    #[test]
    fn test_parse_remote_tags_skips_malformed() {
        let output = listing(&[
            "v5", "V", "Vx", "V3-rc1", "release-9", "1.2.3", "V0", "foo/V8", "V2",
        ]);
        assert_eq!(names(&parse_remote_tags(&output)), vec!["V2"]);
    }

    #[test]
    fn test_parse_remote_tags_numeric_ordering() {
        let tags = parse_remote_tags(&listing(&["V9", "V10", "V100"]));
        assert_eq!(tags.last().map(ToString::to_string).as_deref(), Some("V100"));
    }

    #[test]
    fn test_parse_remote_tags_ignores_branches() {
        let output = format!("{SHA}\trefs/heads/V9\n{}", listing(&["V1"]));
        assert_eq!(names(&parse_remote_tags(&output)), vec!["V1"]);
    }

    #[test]
    fn test_next_version_after_gap() {
        let runner =
            ScriptedRunner::new().on("ls-remote --tags", 0, &listing(&["V1", "V2", "V4"]), "");
        let resolver = VersionResolver::new(&runner);

        assert_eq!(resolver.next_version("/srv/repo.git").unwrap().to_string(), "V5");
    }

    #[test]
    fn test_next_version_no_tags() {
        let runner = ScriptedRunner::new();
        let resolver = VersionResolver::new(&runner);

        assert_eq!(resolver.next_version("/srv/repo.git").unwrap(), VersionTag::FIRST);
        assert_eq!(runner.calls(), vec!["git ls-remote --tags /srv/repo.git"]);
    }

    #[test]
    fn test_next_version_failed_listing_is_error() {
        let runner = ScriptedRunner::new().on(
            "ls-remote --tags",
            128,
            "",
            "fatal: unable to access 'https://host/repo.git/': Failed to connect",
        );
        let resolver = VersionResolver::new(&runner);

        match resolver.next_version("https://u:t@host/repo.git") {
            Err(CoreError::VersionDiscovery(GitError::CommandFailed { exit_code, command, .. })) => {
                assert_eq!(exit_code, 128);
                assert!(!command.contains("u:t@"));
            }
            other => panic!("expected version discovery failure, got {other:?}"),
        }
    }

    #[test]
    fn test_next_version_launch_failure() {
        let runner = ScriptedRunner::new().fail_launch("ls-remote --tags");
        let resolver = VersionResolver::new(&runner);

        assert!(matches!(
            resolver.next_version("/srv/repo.git"),
            Err(CoreError::VersionDiscovery(GitError::Launch { .. }))
        ));
    }
}

//! Version-control abstraction layer
//!
//! The release workflows only ever talk to a [Repository]. Two
//! implementations exist:
//!
//! - [system::GitRepository]: the real checkout. Commands that touch the
//!   network or the working tree shell out to the `git` executable so the
//!   user's credentials and hooks apply; local inspection (status, tags,
//!   remote URLs, branch deletion) goes through `git2`.
//! - [mock::MockRepository]: records every command it is asked to run and
//!   returns scripted answers. This is the seam the workflow tests use.
//!
//! Both render the operations through [args] so the recorded command log
//! matches what the real repository would run.

pub mod args;
pub mod mock;
pub mod system;

pub use mock::MockRepository;
pub use system::GitRepository;

use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::path::Path;

/// Which configured remote a push targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    /// The user's fork
    Origin,
    /// The canonical project repository
    Upstream,
}

/// Capabilities the release workflows need from a version-control checkout
///
/// All methods are synchronous; a failing underlying command surfaces as
/// [ReleaseError::CommandFailed] and is never retried.
pub trait Repository {
    /// Root of the working tree
    fn directory(&self) -> &Path;

    /// Name of the upstream remote (e.g. "upstream")
    fn upstream_name(&self) -> &str;

    /// Name of the origin remote (e.g. "origin")
    fn origin_name(&self) -> &str;

    /// Short status lines for uncommitted changes; empty means clean
    fn status(&self) -> Result<Vec<String>>;

    /// Stage `path`
    fn add(&self, path: &str) -> Result<()>;

    /// Check out `reference`, optionally creating `new_branch` at it
    fn checkout(&self, reference: Option<&str>, new_branch: Option<&str>) -> Result<()>;

    /// Commit staged changes with `title` as the message
    fn commit(&self, title: &str) -> Result<()>;

    /// Fast-forward the current branch from `reference` on upstream
    fn fast_forward_upstream(&self, reference: &str) -> Result<()>;

    /// Fetch upstream, optionally restricted to `reference`
    fn fetch_upstream(&self, reference: Option<&str>) -> Result<()>;

    /// Heads on upstream matching `branch`; empty when the branch does not exist
    fn list_upstream_heads(&self, branch: &str) -> Result<Vec<String>>;

    /// Raw output of `git log <revision_range> <options...>`
    fn log(&self, revision_range: &str, options: &[&str]) -> Result<String>;

    /// Push `branch` to the same name on `remote`, with tags if requested
    fn push(&self, remote: RemoteKind, branch: &str, include_tags: bool) -> Result<()>;

    /// Names of all local tags
    fn tags(&self) -> Result<Vec<String>>;

    /// Force-delete a local branch
    fn delete_local_branch(&self, name: &str) -> Result<()>;

    /// URL configured for remote `remote_name`
    fn remote_url(&self, remote_name: &str) -> Result<String>;

    /// Configured name of the given remote kind
    fn remote_name(&self, remote: RemoteKind) -> &str {
        match remote {
            RemoteKind::Origin => self.origin_name(),
            RemoteKind::Upstream => self.upstream_name(),
        }
    }
}

/// Extract `owner/repo` from a GitHub remote URL (https or ssh)
pub fn repository_from_url(url: &str) -> Result<String> {
    let re = Regex::new(r"github\.com[:/]([\w.-]+/[\w.-]+?)(?:\.git)?/?$")
        .map_err(|e| ReleaseError::config(e.to_string()))?;
    re.captures(url.trim())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            ReleaseError::config(format!("Cannot extract GitHub repository from url: {}", url))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_from_https_url() {
        assert_eq!(
            repository_from_url("https://github.com/prestodb/presto.git").unwrap(),
            "prestodb/presto"
        );
        assert_eq!(
            repository_from_url("https://token@github.com/prestodb/presto").unwrap(),
            "prestodb/presto"
        );
    }

    #[test]
    fn test_repository_from_ssh_url() {
        assert_eq!(
            repository_from_url("git@github.com:jdoe/presto.git\n").unwrap(),
            "jdoe/presto"
        );
    }

    #[test]
    fn test_repository_from_unknown_url() {
        assert!(repository_from_url("https://gitlab.com/prestodb/presto.git").is_err());
        assert!(repository_from_url("").is_err());
    }

    #[test]
    fn test_remote_name_by_kind() {
        let repo = MockRepository::new("/tmp");
        assert_eq!(repo.remote_name(RemoteKind::Upstream), "upstream");
        assert_eq!(repo.remote_name(RemoteKind::Origin), "origin");
    }
}

//! GitHub access
//!
//! Release notes are built from the commit history GitHub reports for a
//! release branch, and published as a pull request. Both go through the
//! [GithubClient] trait so the workflow can be tested against
//! [mock::MockGithub].

pub mod graphql;
pub mod mock;

pub use graphql::GithubGraphQl;
pub use mock::{CreatedPullRequest, MockGithub};

use crate::domain::{Commit, PullRequest};
use crate::error::{ReleaseError, Result};

pub trait GithubClient {
    /// Commits of `branch` in `repository` (`owner/name`), newest first,
    /// stopping once the commit `earliest` has been returned
    fn list_commits(&self, repository: &str, branch: &str, earliest: &str) -> Result<Vec<Commit>>;

    /// Open a pull request from `head` into `base`
    fn create_pull_request(
        &self,
        repository: &str,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;
}

/// Split `owner/name`
pub fn split_repository(repository: &str) -> Result<(&str, &str)> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(ReleaseError::github(format!(
            "Repository must be in format 'owner/name': {}",
            repository
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_repository() {
        assert_eq!(split_repository("prestodb/presto").unwrap(), ("prestodb", "presto"));
        assert!(split_repository("presto").is_err());
        assert!(split_repository("a/b/c").is_err());
        assert!(split_repository("/presto").is_err());
    }
}

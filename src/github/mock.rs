use crate::command::CommandLog;
use crate::domain::{Actor, Commit, PullRequest};
use crate::error::Result;
use crate::github::{split_repository, GithubClient};
use std::sync::Mutex;

/// A pull request opened through [MockGithub]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    pub repository: String,
    pub base: String,
    pub head: String,
    pub title: String,
    pub body: String,
}

/// Serves a fixed commit history and records created pull requests
#[derive(Debug, Default)]
pub struct MockGithub {
    log: CommandLog,
    commits: Vec<Commit>,
    created: Mutex<Vec<CreatedPullRequest>>,
}

impl MockGithub {
    /// `commits` are returned newest first, as GitHub reports history
    pub fn new(log: CommandLog, commits: Vec<Commit>) -> Self {
        MockGithub {
            log,
            commits,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn created_pull_requests(&self) -> Vec<CreatedPullRequest> {
        self.created
            .lock()
            .map(|created| created.clone())
            .unwrap_or_default()
    }
}

impl GithubClient for MockGithub {
    fn list_commits(&self, repository: &str, branch: &str, earliest: &str) -> Result<Vec<Commit>> {
        split_repository(repository)?;
        self.log
            .log("github", &["list-commits", repository, branch, earliest]);

        let mut commits = Vec::new();
        for commit in &self.commits {
            commits.push(commit.clone());
            if commit.id == earliest {
                break;
            }
        }
        Ok(commits)
    }

    fn create_pull_request(
        &self,
        repository: &str,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        split_repository(repository)?;
        self.log
            .log("github", &["create-pull-request", repository, base, head, title]);

        let mut created = self
            .created
            .lock()
            .map_err(|_| crate::error::ReleaseError::github("mock state poisoned"))?;
        created.push(CreatedPullRequest {
            repository: repository.to_string(),
            base: base.to_string(),
            head: head.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        let id = 90000 + created.len() as u64;
        Ok(PullRequest {
            id,
            title: title.to_string(),
            url: format!("https://github.com/{}/pull/{}", repository, id),
            description: body.to_string(),
            author: Actor::new(head.split(':').next().unwrap_or_default()),
            merged_by: None,
        })
    }
}

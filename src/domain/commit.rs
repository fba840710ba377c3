use std::hash::{Hash, Hasher};

/// A GitHub account referenced only by login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub login: String,
}

impl Actor {
    pub fn new(login: impl Into<String>) -> Self {
        Actor {
            login: login.into(),
        }
    }
}

/// A GitHub user with an optional display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
}

impl User {
    pub fn new(login: impl Into<String>, name: Option<String>) -> Self {
        User {
            login: login.into(),
            name,
        }
    }

    /// Display name, falling back to the login
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// A merged pull request. Identity is the pull request number.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub author: Actor,
    pub merged_by: Option<User>,
}

impl PartialEq for PullRequest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PullRequest {}

impl Hash for PullRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A commit on a release branch together with the pull requests that introduced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: String,
    pub title: String,
    pub author: String,
    pub associated_pull_requests: Vec<PullRequest>,
}

impl Commit {
    /// Build a commit from a full message; the title is its first line.
    pub fn from_message(
        id: impl Into<String>,
        message: &str,
        author: impl Into<String>,
        associated_pull_requests: Vec<PullRequest>,
    ) -> Self {
        Commit {
            id: id.into(),
            title: message.lines().next().unwrap_or_default().trim().to_string(),
            author: author.into(),
            associated_pull_requests,
        }
    }
}

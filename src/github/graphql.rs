use crate::config::GithubConfig;
use crate::domain::{Actor, Commit, PullRequest, User};
use crate::error::{ReleaseError, Result};
use crate::github::{split_repository, GithubClient};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const PAGE_SIZE: usize = 30;

/// GitHub GraphQL v4 client
pub struct GithubGraphQl {
    client: reqwest::blocking::Client,
    api_url: String,
    token: String,
}

impl GithubGraphQl {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let token = config.resolve_access_token()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(format!("release-tools/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GithubGraphQl {
            client,
            api_url: config.api_url.clone(),
            token,
        })
    }

    fn execute<T: DeserializeOwned>(&self, query: &str, variables: Option<Value>) -> Result<T> {
        let mut payload = json!({ "query": query });
        if let Some(variables) = variables {
            payload["variables"] = variables;
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/json")
            .json(&payload)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ReleaseError::github(format!(
                "GitHub API returned {}: {}",
                status, body
            )));
        }
        parse_response(&body)
    }

    fn history_page(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
        after: Option<&str>,
    ) -> Result<CommitHistory> {
        let data: RepositoryData<RefData> =
            self.execute(&list_commits_query(owner, name, branch, after), None)?;
        data.repository
            .reference
            .map(|reference| reference.target.history)
            .ok_or_else(|| {
                ReleaseError::github(format!("Branch {} not found in {}/{}", branch, owner, name))
            })
    }

    fn repository_id(&self, owner: &str, name: &str) -> Result<String> {
        let data: RepositoryData<RepositoryId> =
            self.execute(&repository_id_query(owner, name), None)?;
        Ok(data.repository.id)
    }
}

impl GithubClient for GithubGraphQl {
    fn list_commits(&self, repository: &str, branch: &str, earliest: &str) -> Result<Vec<Commit>> {
        let (owner, name) = split_repository(repository)?;

        let mut commits = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let history = self.history_page(owner, name, branch, cursor.as_deref())?;
            debug!(count = history.edges.len(), "fetched commit page");

            if collect_until(history.edges, earliest, &mut commits) {
                return Ok(commits);
            }
            match history.page_info {
                PageInfo {
                    has_next_page: true,
                    end_cursor: Some(end_cursor),
                } => cursor = Some(end_cursor),
                _ => return Ok(commits),
            }
        }
    }

    fn create_pull_request(
        &self,
        repository: &str,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        let (owner, name) = split_repository(repository)?;
        let repository_id = self.repository_id(owner, name)?;

        let variables = json!({
            "pr": {
                "repositoryId": repository_id,
                "baseRefName": base,
                "headRefName": head,
                "maintainerCanModify": false,
                "title": title,
                "body": body,
            }
        });
        let data: CreatePullRequestData = self.execute(CREATE_PULL_REQUEST_MUTATION, Some(variables))?;
        Ok(data.create_pull_request.pull_request.into())
    }
}

/// Append the commits of one page, returning true once `earliest` was reached
fn collect_until(edges: Vec<CommitEdge>, earliest: &str, commits: &mut Vec<Commit>) -> bool {
    for edge in edges {
        let commit: Commit = edge.node.into();
        let reached = commit.id == earliest;
        commits.push(commit);
        if reached {
            return true;
        }
    }
    false
}

/// Decode a GraphQL response body, surfacing reported errors
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: GraphQlResponse<T> = serde_json::from_str(body)?;
    if let Some(errors) = response.errors.filter(|errors| !errors.is_null()) {
        return Err(ReleaseError::github(format!("GraphQL error: {}", errors)));
    }
    response
        .data
        .ok_or_else(|| ReleaseError::github(format!("GraphQL no data: {}", body)))
}

pub fn list_commits_query(owner: &str, name: &str, branch: &str, after: Option<&str>) -> String {
    let after = match after {
        Some(cursor) => format!("\"{}\"", cursor),
        None => "null".to_string(),
    };
    format!(
        r#"{{
    repository(owner: "{owner}", name: "{name}") {{
        ref(qualifiedName: "{branch}") {{
            target {{
                ... on Commit {{
                    history(first: {page_size}, after: {after}) {{
                        pageInfo {{
                            hasNextPage
                            endCursor
                        }}
                        edges {{
                            node {{
                                oid
                                message
                                author {{
                                    name
                                }}
                                associatedPullRequests(first: 10) {{
                                    nodes {{
                                        number
                                        title
                                        url
                                        bodyText
                                        author {{
                                            login
                                        }}
                                        mergedBy {{
                                            ... on User {{
                                                login
                                                name
                                            }}
                                        }}
                                    }}
                                }}
                            }}
                        }}
                    }}
                }}
            }}
        }}
    }}
}}"#,
        owner = owner,
        name = name,
        branch = branch,
        page_size = PAGE_SIZE,
        after = after,
    )
}

fn repository_id_query(owner: &str, name: &str) -> String {
    format!(
        r#"{{
    repository(owner: "{}", name: "{}") {{
        id
    }}
}}"#,
        owner, name
    )
}

const CREATE_PULL_REQUEST_MUTATION: &str = r#"mutation($pr: CreatePullRequestInput!) {
    createPullRequest(input: $pr) {
        pullRequest {
            number
            title
            url
            bodyText
            author {
                login
            }
            mergedBy {
                ... on User {
                    login
                    name
                }
            }
        }
    }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RepositoryData<T> {
    repository: T,
}

#[derive(Debug, Deserialize)]
struct RepositoryId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RefData {
    #[serde(rename = "ref")]
    reference: Option<TargetData>,
}

#[derive(Debug, Deserialize)]
struct TargetData {
    target: HistoryData,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    history: CommitHistory,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitHistory {
    page_info: PageInfo,
    edges: Vec<CommitEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitEdge {
    node: CommitNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    oid: String,
    message: String,
    author: Option<GitActorNode>,
    associated_pull_requests: PullRequestConnection,
}

#[derive(Debug, Deserialize)]
struct GitActorNode {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestConnection {
    nodes: Vec<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    title: String,
    url: String,
    #[serde(default)]
    body_text: String,
    author: Option<ActorNode>,
    merged_by: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct ActorNode {
    login: String,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    login: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePullRequestData {
    create_pull_request: CreatedPullRequestPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedPullRequestPayload {
    pull_request: PullRequestNode,
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        PullRequest {
            id: node.number,
            title: node.title,
            url: node.url,
            description: node.body_text,
            // Deleted accounts come back without an author
            author: Actor::new(node.author.map(|a| a.login).unwrap_or_else(|| "ghost".to_string())),
            merged_by: node
                .merged_by
                .and_then(|user| user.login.map(|login| User::new(login, user.name))),
        }
    }
}

impl From<CommitNode> for Commit {
    fn from(node: CommitNode) -> Self {
        Commit::from_message(
            node.oid,
            &node.message,
            node.author.and_then(|a| a.name).unwrap_or_default(),
            node.associated_pull_requests
                .nodes
                .into_iter()
                .map(PullRequest::from)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY_PAGE: &str = r#"{
  "data": {
    "repository": {
      "ref": {
        "target": {
          "history": {
            "pageInfo": { "hasNextPage": true, "endCursor": "abc 29" },
            "edges": [
              {
                "node": {
                  "oid": "c2",
                  "message": "Fix query planning\n\nDetails",
                  "author": { "name": "Jane Doe" },
                  "associatedPullRequests": {
                    "nodes": [
                      {
                        "number": 14001,
                        "title": "Fix query planning",
                        "url": "https://github.com/prestodb/presto/pull/14001",
                        "bodyText": "== RELEASE NOTES ==",
                        "author": { "login": "jdoe" },
                        "mergedBy": { "login": "maint", "name": null }
                      }
                    ]
                  }
                }
              },
              {
                "node": {
                  "oid": "c1",
                  "message": "Direct commit",
                  "author": null,
                  "associatedPullRequests": { "nodes": [] }
                }
              }
            ]
          }
        }
      }
    }
  }
}"#;

    #[test]
    fn test_parse_history_page() {
        let data: RepositoryData<RefData> = parse_response(HISTORY_PAGE).unwrap();
        let history = data.repository.reference.unwrap().target.history;
        assert!(history.page_info.has_next_page);
        assert_eq!(history.page_info.end_cursor.as_deref(), Some("abc 29"));

        let mut commits = Vec::new();
        assert!(!collect_until(history.edges, "c0", &mut commits));
        assert_eq!(commits.len(), 2);

        let first = &commits[0];
        assert_eq!(first.title, "Fix query planning");
        assert_eq!(first.author, "Jane Doe");
        let pr = &first.associated_pull_requests[0];
        assert_eq!(pr.id, 14001);
        assert_eq!(pr.author.login, "jdoe");
        assert_eq!(pr.merged_by.as_ref().unwrap().display_name(), "maint");

        assert_eq!(commits[1].author, "");
    }

    #[test]
    fn test_collect_stops_at_earliest() {
        let data: RepositoryData<RefData> = parse_response(HISTORY_PAGE).unwrap();
        let history = data.repository.reference.unwrap().target.history;

        let mut commits = Vec::new();
        assert!(collect_until(history.edges, "c2", &mut commits));
        assert_eq!(commits.len(), 1);
    }

    #[test]
    fn test_graphql_errors_are_reported() {
        let body = r#"{"errors":[{"message":"Bad credentials"}]}"#;
        let err = parse_response::<RepositoryData<RepositoryId>>(body).unwrap_err();
        assert!(err.to_string().starts_with("GraphQL error:"));
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[test]
    fn test_missing_data_is_reported() {
        let err = parse_response::<RepositoryData<RepositoryId>>("{}").unwrap_err();
        assert_eq!(err.to_string(), "GraphQL no data: {}");
    }

    #[test]
    fn test_list_commits_query_cursor() {
        let first = list_commits_query("prestodb", "presto", "release-0.231", None);
        assert!(first.contains("history(first: 30, after: null)"));
        assert!(first.contains(r#"repository(owner: "prestodb", name: "presto")"#));

        let next = list_commits_query("prestodb", "presto", "release-0.231", Some("abc 29"));
        assert!(next.contains(r#"after: "abc 29""#));
    }

    #[test]
    fn test_created_pull_request() {
        let body = r#"{"data":{"createPullRequest":{"pullRequest":{
            "number": 15000, "title": "Add release notes for 0.231",
            "url": "https://github.com/prestodb/presto/pull/15000", "bodyText": "",
            "author": {"login": "jdoe"}, "mergedBy": null}}}}"#;
        let data: CreatePullRequestData = parse_response(body).unwrap();
        let pr: PullRequest = data.create_pull_request.pull_request.into();
        assert_eq!(pr.id, 15000);
        assert!(pr.merged_by.is_none());
    }
}
